use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::color::{ColorAllocator, Palette, Rgb};
use crate::contact::{ContactId, ContactRegistry, SourceKind};
use crate::event::{normalize, Action, ContactEvent, InputEvent, Phase};
use crate::render::{MarkerAssets, Point, Renderer, Size, TextRenderer, Texture};
use crate::sound::{play_cue, Mixer, SoundCue};

/// Turns input events into contact lifecycle changes and remembers whether the scene needs
/// to be drawn again.
pub struct SceneController<T, M> {
    registry: ContactRegistry<T>,
    colors: ColorAllocator,
    palette: Palette,
    mixer: M,
    surface: Size,
    dirty: bool,
    quit: bool,
}

impl<T: Texture, M: Mixer> SceneController<T, M> {
    pub fn new(palette: Palette, rng: StdRng, mixer: M, surface: Size) -> Self {
        let colors = ColorAllocator::new(palette.len(), rng);
        Self {
            registry: ContactRegistry::new(),
            colors,
            palette,
            mixer,
            surface,
            dirty: false,
            quit: false,
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        match normalize(event, self.surface) {
            Action::Contact(ContactEvent {
                phase: Phase::Start,
                id,
                position,
            }) => self.contact_start(id, position),
            Action::Contact(ContactEvent {
                phase: Phase::Move,
                id,
                ..
            }) if id.kind == SourceKind::Pointer && !self.registry.contains(id) => {
                // no button held, nothing to track
            }
            Action::Contact(ContactEvent {
                phase: Phase::Move,
                id,
                position,
            }) => self.contact_move(id, position),
            Action::Contact(ContactEvent {
                phase: Phase::End,
                id,
                ..
            }) => self.contact_end(id),
            Action::Quit => {
                info!("Quit requested");
                self.quit = true;
            }
            Action::Ignore => {}
        }
    }

    pub fn contact_start(&mut self, id: ContactId, position: Point) {
        if self
            .registry
            .create(id, position, &self.palette, &mut self.colors)
            .is_ok()
        {
            self.dirty = true;
        }
        play_cue(&mut self.mixer, SoundCue::ContactBegin);
    }

    pub fn contact_move(&mut self, id: ContactId, position: Point) {
        if let Ok(true) = self.registry.move_to(id, position) {
            self.dirty = true;
        }
    }

    /// The end cue plays before the lookup, so it is heard even for contacts that were never
    /// tracked.
    pub fn contact_end(&mut self, id: ContactId) {
        play_cue(&mut self.mixer, SoundCue::ContactEnd);
        if self.registry.remove(id, &mut self.colors).is_ok() {
            self.dirty = true;
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn redraw<R, F>(&mut self, renderer: &mut R, text: &mut F, assets: &MarkerAssets<T>)
    where
        R: Renderer<Texture = T>,
        F: TextRenderer<Texture = T>,
    {
        renderer.clear(Rgb::BLACK);
        for contact in self.registry.iter() {
            contact.visual().draw(renderer, text, assets);
        }
        renderer.present();
        debug!("Redrew {} contacts", self.registry.len());
        self.dirty = false;
    }

    pub fn registry(&self) -> &ContactRegistry<T> {
        &self.registry
    }

    pub fn colors(&self) -> &ColorAllocator {
        &self.colors
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn surface(&self) -> Size {
        self.surface
    }
}
