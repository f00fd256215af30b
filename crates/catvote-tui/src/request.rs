//! Backend exchanges as values.
//!
//! The controller plans a [`Request`], something runs it with [`execute`],
//! and the resulting [`Loaded`] is folded back with `Controller::apply`.
//! The event loop runs `execute` on a spawned task so input keeps flowing
//! while the backend answers; tests run it inline.

use catvote_proto::client::{CatApi, ClientError};
use catvote_proto::protocol::{
    ActionOutcome, BreedDetails, BreedSummary, CatImage, Favorite, VoteAction,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    RandomImage,
    /// Like, dislike or favorite `target`, the image on screen when asked.
    Vote {
        action: VoteAction,
        target: CatImage,
    },
    Breeds,
    BreedDetails(String),
    Favorites,
}

#[derive(Debug)]
pub enum Loaded {
    RandomImage(Result<CatImage, ClientError>),
    Vote {
        action: VoteAction,
        target: CatImage,
        result: Result<ActionOutcome, ClientError>,
    },
    Breeds(Result<Vec<BreedSummary>, ClientError>),
    BreedDetails {
        breed_id: String,
        result: Result<BreedDetails, ClientError>,
    },
    Favorites(Result<Vec<Favorite>, ClientError>),
}

impl Loaded {
    pub fn is_ok(&self) -> bool {
        match self {
            Self::RandomImage(r) => r.is_ok(),
            Self::Vote { result, .. } => result.is_ok(),
            Self::Breeds(r) => r.is_ok(),
            Self::BreedDetails { result, .. } => result.is_ok(),
            Self::Favorites(r) => r.is_ok(),
        }
    }
}

pub async fn execute<A: CatApi>(api: &A, request: Request) -> Loaded {
    match request {
        Request::RandomImage => Loaded::RandomImage(api.fetch_random_image().await),
        Request::Vote { action, target } => {
            let result = api
                .submit_action(action, &target.url, target.id.as_deref())
                .await;
            Loaded::Vote {
                action,
                target,
                result,
            }
        }
        Request::Breeds => Loaded::Breeds(api.fetch_breeds().await),
        Request::BreedDetails(breed_id) => {
            let result = api.fetch_breed_details(&breed_id).await;
            Loaded::BreedDetails { breed_id, result }
        }
        Request::Favorites => Loaded::Favorites(api.fetch_favorites().await),
    }
}
