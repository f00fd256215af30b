//! BreedPanel: breed selector, metadata, and the image carousel.

use catvote_proto::client::ClientError;
use catvote_proto::protocol::{BreedDetails, BreedSummary};
use tracing::{error, info};

use crate::carousel::{Carousel, CarouselAdapter, Slide};
use crate::session::SessionState;
use crate::view::{BreedHeading, View};

pub struct BreedPanel<C: Carousel> {
    carousel: CarouselAdapter<C>,
}

impl<C: Carousel> BreedPanel<C> {
    pub fn new(carousel: CarouselAdapter<C>) -> Self {
        Self { carousel }
    }

    pub fn carousel(&self) -> &CarouselAdapter<C> {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut CarouselAdapter<C> {
        &mut self.carousel
    }

    /// Fill the selector and select the first breed. Returns the breed whose
    /// details should load next.
    ///
    /// A failed fetch leaves the selector as it was.
    pub fn show_breeds<V: View>(
        &mut self,
        view: &mut V,
        result: Result<Vec<BreedSummary>, ClientError>,
    ) -> Option<String> {
        let breeds = match result {
            Ok(breeds) => breeds,
            Err(e) => {
                error!("Error fetching breeds: {}", e);
                return None;
            }
        };
        info!("breeds: {} options", breeds.len());
        view.set_breed_options(&breeds);

        let first = breeds.first()?;
        view.set_selected_breed(&first.id);
        Some(first.id.clone())
    }

    /// Show fetched details. Failure keeps whatever is on screen.
    pub fn show_breed_details<V: View>(
        &mut self,
        view: &mut V,
        session: &mut SessionState,
        breed_id: &str,
        result: Result<BreedDetails, ClientError>,
    ) {
        match result {
            Ok(details) => {
                session.current_breed_id = Some(details.breed.id.clone());
                self.show_details(view, &details);
            }
            Err(e) => error!("Error fetching breed details for {}: {}", breed_id, e),
        }
    }

    /// Selector change: remember the breed before its details arrive.
    pub fn select_breed<V: View>(
        &mut self,
        view: &mut V,
        session: &mut SessionState,
        breed_id: &str,
    ) {
        session.current_breed_id = Some(breed_id.to_string());
        view.set_selected_breed(breed_id);
    }

    fn show_details<V: View>(&mut self, view: &mut V, details: &BreedDetails) {
        let breed = &details.breed;
        view.set_breed_heading(BreedHeading {
            name: breed.name.clone(),
            origin: breed.origin().map(str::to_string),
            id: breed.id.clone(),
        });
        view.set_breed_description(&breed.description);
        view.set_wiki_link(breed.wikipedia_url());

        let slides: Vec<Slide> = details
            .images
            .iter()
            .map(|img| Slide {
                url: img.url.clone(),
            })
            .collect();
        self.carousel.rebuild(&slides);
    }
}
