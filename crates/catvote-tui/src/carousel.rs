//! Carousel: injected slider capability plus the destroy-then-build adapter.
//!
//! The controller only sees [`Carousel`]. [`TerminalCarousel`] is the
//! in-terminal implementation: a single [`SlideShow`] advanced by the UI tick.

use std::time::{Duration, Instant};

use catvote_proto::config::CarouselConfig;
use tracing::{debug, warn};

/// One slide: an image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselOptions {
    pub slides_per_view: u16,
    pub space_between: u16,
    pub looped: bool,
    pub autoplay_delay: Duration,
    /// Autoplay keeps running after the user clicks an indicator.
    pub disable_on_interaction: bool,
    pub pause_on_hover: bool,
    pub clickable_pagination: bool,
}

impl CarouselOptions {
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self {
            autoplay_delay: config.autoplay_delay(),
            pause_on_hover: config.pause_on_hover,
            ..Self::default()
        }
    }
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            slides_per_view: 1,
            space_between: 0,
            looped: true,
            autoplay_delay: Duration::from_millis(2000),
            disable_on_interaction: false,
            pause_on_hover: true,
            clickable_pagination: true,
        }
    }
}

/// A slider widget that can be built over slides and torn down again.
pub trait Carousel {
    type Handle;

    fn build(&mut self, slides: &[Slide], options: &CarouselOptions) -> Self::Handle;

    /// Release everything the instance attached.
    fn destroy(&mut self, handle: Self::Handle);
}

/// Owns at most one live carousel instance.
pub struct CarouselAdapter<C: Carousel> {
    carousel: C,
    handle: Option<C::Handle>,
    options: CarouselOptions,
}

impl<C: Carousel> CarouselAdapter<C> {
    pub fn new(carousel: C, options: CarouselOptions) -> Self {
        Self {
            carousel,
            handle: None,
            options,
        }
    }

    /// Replace the live instance with one over `slides`.
    pub fn rebuild(&mut self, slides: &[Slide]) {
        if let Some(handle) = self.handle.take() {
            self.carousel.destroy(handle);
        }
        self.handle = Some(self.carousel.build(slides, &self.options));
    }

    pub fn teardown(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.carousel.destroy(handle);
        }
    }

    pub fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    pub fn carousel(&self) -> &C {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut C {
        &mut self.carousel
    }
}

// ── Terminal implementation ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideShowId(u64);

/// A running slider: current slide, autoplay clock, hover pause.
#[derive(Debug, Clone)]
pub struct SlideShow {
    id: SlideShowId,
    slides: Vec<Slide>,
    options: CarouselOptions,
    index: usize,
    hovered: bool,
    autoplay: bool,
    last_advance: Instant,
}

impl SlideShow {
    fn new(id: SlideShowId, slides: &[Slide], options: &CarouselOptions, now: Instant) -> Self {
        Self {
            id,
            slides: slides.to_vec(),
            options: options.clone(),
            index: 0,
            hovered: false,
            autoplay: true,
            last_advance: now,
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.index)
    }

    pub fn is_paused(&self) -> bool {
        !self.autoplay || (self.hovered && self.options.pause_on_hover)
    }

    /// Advance when the autoplay delay has elapsed. Returns true on a move.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.slides.len() < 2 {
            return false;
        }
        if self.is_paused() {
            // Restart the delay once the pointer leaves.
            self.last_advance = now;
            return false;
        }
        if now.duration_since(self.last_advance) < self.options.autoplay_delay {
            return false;
        }
        self.last_advance = now;
        self.step(1)
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Jump via the page indicator.
    pub fn go_to(&mut self, index: usize, now: Instant) -> bool {
        if !self.options.clickable_pagination || index >= self.slides.len() {
            return false;
        }
        self.index = index;
        self.last_advance = now;
        if self.options.disable_on_interaction {
            self.autoplay = false;
        }
        true
    }

    fn step(&mut self, by: usize) -> bool {
        let len = self.slides.len();
        let next = self.index + by;
        if next < len {
            self.index = next;
            true
        } else if self.options.looped {
            self.index = next % len;
            true
        } else {
            false
        }
    }
}

/// Single-slot carousel drawn by the breeds panel.
#[derive(Debug, Default)]
pub struct TerminalCarousel {
    next_id: u64,
    live: Option<SlideShow>,
}

impl TerminalCarousel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slideshow(&self) -> Option<&SlideShow> {
        self.live.as_ref()
    }

    pub fn slideshow_mut(&mut self) -> Option<&mut SlideShow> {
        self.live.as_mut()
    }
}

impl Carousel for TerminalCarousel {
    type Handle = SlideShowId;

    fn build(&mut self, slides: &[Slide], options: &CarouselOptions) -> SlideShowId {
        if let Some(old) = self.live.take() {
            warn!("carousel: build over live instance {:?}, dropping it", old.id);
        }
        self.next_id += 1;
        let id = SlideShowId(self.next_id);
        debug!("carousel: built {:?} with {} slides", id, slides.len());
        self.live = Some(SlideShow::new(id, slides, options, Instant::now()));
        id
    }

    fn destroy(&mut self, handle: SlideShowId) {
        match &self.live {
            Some(show) if show.id == handle => {
                debug!("carousel: destroyed {:?}", handle);
                self.live = None;
            }
            _ => warn!("carousel: destroy of unknown instance {:?}", handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slides(n: usize) -> Vec<Slide> {
        (0..n)
            .map(|i| Slide {
                url: format!("https://cdn/{}.jpg", i),
            })
            .collect()
    }

    #[derive(Default)]
    struct CountingCarousel {
        live: usize,
        max_live: usize,
        built: usize,
    }

    impl Carousel for CountingCarousel {
        type Handle = usize;

        fn build(&mut self, _slides: &[Slide], _options: &CarouselOptions) -> usize {
            self.live += 1;
            self.max_live = self.max_live.max(self.live);
            self.built += 1;
            self.built
        }

        fn destroy(&mut self, _handle: usize) {
            self.live -= 1;
        }
    }

    #[test]
    fn test_rebuild_destroys_before_building() {
        let mut adapter = CarouselAdapter::new(CountingCarousel::default(), CarouselOptions::default());
        for n in 1..=4 {
            adapter.rebuild(&slides(n));
        }
        assert_eq!(adapter.carousel().built, 4);
        assert_eq!(adapter.carousel().live, 1);
        assert_eq!(adapter.carousel().max_live, 1);

        adapter.teardown();
        assert_eq!(adapter.carousel().live, 0);
        assert!(!adapter.is_live());
    }

    #[test]
    fn test_terminal_carousel_keeps_one_instance() {
        let mut adapter = CarouselAdapter::new(TerminalCarousel::new(), CarouselOptions::default());
        adapter.rebuild(&slides(3));
        adapter.rebuild(&slides(2));
        let show = adapter.carousel().slideshow().unwrap();
        assert_eq!(show.slides().len(), 2);
        assert_eq!(show.id, SlideShowId(2));
    }

    #[test]
    fn test_autoplay_loops() {
        let options = CarouselOptions {
            autoplay_delay: Duration::from_millis(100),
            ..CarouselOptions::default()
        };
        let start = Instant::now();
        let mut show = SlideShow::new(SlideShowId(1), &slides(2), &options, start);

        assert!(!show.tick(start + Duration::from_millis(50)));
        assert!(show.tick(start + Duration::from_millis(100)));
        assert_eq!(show.index(), 1);
        assert!(show.tick(start + Duration::from_millis(200)));
        assert_eq!(show.index(), 0);
    }

    #[test]
    fn test_hover_pauses_autoplay() {
        let options = CarouselOptions {
            autoplay_delay: Duration::from_millis(100),
            ..CarouselOptions::default()
        };
        let start = Instant::now();
        let mut show = SlideShow::new(SlideShowId(1), &slides(3), &options, start);

        show.set_hovered(true);
        assert!(show.is_paused());
        assert!(!show.tick(start + Duration::from_millis(500)));
        assert_eq!(show.index(), 0);

        show.set_hovered(false);
        // Delay restarts from the last paused tick.
        assert!(!show.tick(start + Duration::from_millis(550)));
        assert!(show.tick(start + Duration::from_millis(600)));
        assert_eq!(show.index(), 1);
    }

    #[test]
    fn test_indicator_click_keeps_autoplay() {
        let start = Instant::now();
        let mut show = SlideShow::new(SlideShowId(1), &slides(3), &CarouselOptions::default(), start);
        assert!(show.go_to(2, start));
        assert_eq!(show.current().unwrap().url, "https://cdn/2.jpg");
        assert!(!show.is_paused());
        assert!(!show.go_to(7, start));
    }

    #[test]
    fn test_single_slide_never_moves() {
        let start = Instant::now();
        let mut show = SlideShow::new(SlideShowId(1), &slides(1), &CarouselOptions::default(), start);
        assert!(!show.tick(start + Duration::from_secs(60)));
    }
}
