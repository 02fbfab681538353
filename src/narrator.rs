//! Audio narration interface.
//!
//! The game core never talks to a speech engine directly. Every state change
//! with player-facing meaning goes through a [`Narrator`]: a short sound
//! [`Cue`] and/or a spoken line. Implementations must tolerate being called
//! often and must never block game logic; the core ignores whatever they do.
//!
//! # Backends
//!
//! Real speech engines are picked at startup by probing. [`ProviderChain`]
//! holds [`NarrationProvider`]s in priority order and routes every call to
//! the first one that reports itself available, falling back to console
//! output when none does.

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, info};

use crate::config::AudioSettings;

/// Sound effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Turret moved one lane.
    TurretMove,
    /// Turret fired.
    TurretShoot,
    /// Something was hit.
    EnemyHit,
    /// An action succeeded.
    ActionSuccess,
    /// An action was rejected or something bad happened.
    ActionFail,
    /// Menu cursor moved.
    MenuNav,
    /// Construction started.
    ConstructionStart,
    /// Construction finished.
    ConstructionComplete,
    /// A resource counter changed.
    ResourceChange,
}

impl Cue {
    /// Short lowercase name, used by text front-ends.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Cue::TurretMove => "turret_move",
            Cue::TurretShoot => "turret_shoot",
            Cue::EnemyHit => "enemy_hit",
            Cue::ActionSuccess => "action_success",
            Cue::ActionFail => "action_fail",
            Cue::MenuNav => "menu_nav",
            Cue::ConstructionStart => "construction_start",
            Cue::ConstructionComplete => "construction_complete",
            Cue::ResourceChange => "resource_change",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accessibility collaborator that turns game events into audio.
pub trait Narrator {
    /// Play a sound cue.
    fn play_cue(&mut self, cue: Cue);

    /// Speak a line of text.
    fn speak(&mut self, text: &str);

    /// Pause speech output.
    fn pause(&mut self) {}

    /// Resume paused speech output.
    fn resume(&mut self) {}

    /// Interrupt whatever is being spoken.
    fn stop(&mut self) {}
}

impl<N: Narrator + ?Sized> Narrator for &mut N {
    fn play_cue(&mut self, cue: Cue) {
        (**self).play_cue(cue);
    }

    fn speak(&mut self, text: &str) {
        (**self).speak(text);
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn resume(&mut self) {
        (**self).resume();
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}

impl<N: Narrator + ?Sized> Narrator for Box<N> {
    fn play_cue(&mut self, cue: Cue) {
        (**self).play_cue(cue);
    }

    fn speak(&mut self, text: &str) {
        (**self).speak(text);
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn resume(&mut self) {
        (**self).resume();
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}

/// Narrator that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn play_cue(&mut self, _cue: Cue) {}

    fn speak(&mut self, _text: &str) {}
}

/// One event seen by a [`RecordingNarrator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narration {
    /// A sound cue.
    Cue(Cue),
    /// A spoken line.
    Speech(String),
}

/// Narrator that keeps every event in order.
///
/// Used by tests and by scripted front-ends that want to inspect what the
/// player would have heard.
#[derive(Debug, Clone, Default)]
pub struct RecordingNarrator {
    events: Vec<Narration>,
}

impl RecordingNarrator {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in the order they arrived.
    #[must_use]
    pub fn events(&self) -> &[Narration] {
        &self.events
    }

    /// Cues only, in order.
    pub fn cues(&self) -> impl Iterator<Item = Cue> + '_ {
        self.events.iter().filter_map(|event| match event {
            Narration::Cue(cue) => Some(*cue),
            Narration::Speech(_) => None,
        })
    }

    /// Spoken lines only, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().filter_map(|event| match event {
            Narration::Speech(text) => Some(text.as_str()),
            Narration::Cue(_) => None,
        })
    }

    /// Whether `cue` was played at least once.
    #[must_use]
    pub fn played(&self, cue: Cue) -> bool {
        self.cues().any(|c| c == cue)
    }

    /// Whether any spoken line contains `needle`.
    #[must_use]
    pub fn heard(&self, needle: &str) -> bool {
        self.lines().any(|line| line.contains(needle))
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Narrator for RecordingNarrator {
    fn play_cue(&mut self, cue: Cue) {
        self.events.push(Narration::Cue(cue));
    }

    fn speak(&mut self, text: &str) {
        self.events.push(Narration::Speech(text.to_string()));
    }
}

/// Narrator that writes cues and speech as lines of text.
///
/// This is the last-resort backend: it works on any terminal and with any
/// screen reader that follows console output.
#[derive(Debug)]
pub struct ConsoleNarrator<W: Write = io::Stdout> {
    out: W,
    show_cues: bool,
}

impl ConsoleNarrator<io::Stdout> {
    /// Narrate to standard output.
    #[must_use]
    pub fn stdout(show_cues: bool) -> Self {
        Self::new(io::stdout(), show_cues)
    }
}

impl<W: Write> ConsoleNarrator<W> {
    /// Narrate to an arbitrary writer.
    pub fn new(out: W, show_cues: bool) -> Self {
        Self { out, show_cues }
    }

    /// Consume the narrator and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Narrator for ConsoleNarrator<W> {
    fn play_cue(&mut self, cue: Cue) {
        if self.show_cues {
            // Narration is fire-and-forget; a closed pipe must not stop the game.
            let _ = writeln!(self.out, "[{cue}]");
        }
    }

    fn speak(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn stop(&mut self) {
        let _ = self.out.flush();
    }
}

/// Narrator that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn play_cue(&mut self, cue: Cue) {
        debug!(%cue, "cue");
    }

    fn speak(&mut self, text: &str) {
        info!(text, "narration");
    }
}

/// A speech backend that may or may not be present on this machine.
pub trait NarrationProvider: Narrator {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Whether the backend can be used right now.
    fn is_available(&self) -> bool;
}

impl NarrationProvider for LogNarrator {
    fn name(&self) -> &str {
        "log"
    }

    fn is_available(&self) -> bool {
        true
    }
}

impl<W: Write> NarrationProvider for ConsoleNarrator<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Ranked list of narration backends behind one [`Narrator`].
///
/// Calls go to the first available provider. When none is available the
/// chain degrades to a [`ConsoleNarrator`] on stdout.
pub struct ProviderChain {
    providers: Vec<Box<dyn NarrationProvider>>,
    fallback: ConsoleNarrator,
}

impl fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ProviderChain")
            .field("providers", &names)
            .finish_non_exhaustive()
    }
}

impl ProviderChain {
    /// Build a chain from providers in priority order.
    #[must_use]
    pub fn new(providers: Vec<Box<dyn NarrationProvider>>) -> Self {
        Self {
            providers,
            fallback: ConsoleNarrator::stdout(false),
        }
    }

    /// Name of the backend that currently receives narration.
    #[must_use]
    pub fn active_name(&self) -> &str {
        self.providers
            .iter()
            .find(|p| p.is_available())
            .map_or("console", |p| p.name())
    }

    fn active_index(&self) -> Option<usize> {
        self.providers.iter().position(|p| p.is_available())
    }
}

impl Narrator for ProviderChain {
    fn play_cue(&mut self, cue: Cue) {
        match self.active_index() {
            Some(i) => self.providers[i].play_cue(cue),
            None => self.fallback.play_cue(cue),
        }
    }

    fn speak(&mut self, text: &str) {
        match self.active_index() {
            Some(i) => self.providers[i].speak(text),
            None => self.fallback.speak(text),
        }
    }

    fn pause(&mut self) {
        match self.active_index() {
            Some(i) => self.providers[i].pause(),
            None => self.fallback.pause(),
        }
    }

    fn resume(&mut self) {
        match self.active_index() {
            Some(i) => self.providers[i].resume(),
            None => self.fallback.resume(),
        }
    }

    fn stop(&mut self) {
        match self.active_index() {
            Some(i) => self.providers[i].stop(),
            None => self.fallback.stop(),
        }
    }
}

/// Applies the player's audio settings in front of another narrator.
///
/// Cues are dropped when sounds are disabled and speech when narration is
/// disabled. While paused, speech is dropped; cues still play.
#[derive(Debug, Clone)]
pub struct GatedNarrator<N> {
    inner: N,
    settings: AudioSettings,
    paused: bool,
}

impl<N: Narrator> GatedNarrator<N> {
    /// Wrap `inner` with the given settings.
    pub fn new(inner: N, settings: AudioSettings) -> Self {
        Self {
            inner,
            settings,
            paused: false,
        }
    }

    /// Whether speech is currently paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// The wrapped narrator.
    pub fn inner(&self) -> &N {
        &self.inner
    }

    /// Consume the gate and return the wrapped narrator.
    pub fn into_inner(self) -> N {
        self.inner
    }
}

impl<N: Narrator> Narrator for GatedNarrator<N> {
    fn play_cue(&mut self, cue: Cue) {
        if self.settings.enable_sounds {
            self.inner.play_cue(cue);
        }
    }

    fn speak(&mut self, text: &str) {
        if self.settings.enable_narration && !self.paused {
            self.inner.speak(text);
        }
    }

    fn pause(&mut self) {
        self.paused = true;
        self.inner.pause();
    }

    fn resume(&mut self) {
        self.paused = false;
        self.inner.resume();
    }

    fn stop(&mut self) {
        self.inner.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Unavailable;

    /// Provider whose recording stays readable after it is boxed into a chain.
    struct Shared(Rc<RefCell<RecordingNarrator>>);

    impl Narrator for Shared {
        fn play_cue(&mut self, cue: Cue) {
            self.0.borrow_mut().play_cue(cue);
        }

        fn speak(&mut self, text: &str) {
            self.0.borrow_mut().speak(text);
        }
    }

    impl NarrationProvider for Shared {
        fn name(&self) -> &str {
            "shared"
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    impl Narrator for Unavailable {
        fn play_cue(&mut self, _cue: Cue) {
            panic!("unavailable provider must not be used");
        }

        fn speak(&mut self, _text: &str) {
            panic!("unavailable provider must not be used");
        }
    }

    impl NarrationProvider for Unavailable {
        fn name(&self) -> &str {
            "unavailable"
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_recording_narrator_keeps_order() {
        let mut narrator = RecordingNarrator::new();
        narrator.play_cue(Cue::TurretShoot);
        narrator.speak("Wave 1 incoming");
        narrator.play_cue(Cue::EnemyHit);

        assert_eq!(narrator.events().len(), 3);
        assert_eq!(
            narrator.cues().collect::<Vec<_>>(),
            vec![Cue::TurretShoot, Cue::EnemyHit]
        );
        assert!(narrator.heard("Wave 1"));
        assert!(!narrator.heard("Wave 2"));
    }

    #[test]
    fn test_console_narrator_writes_lines() {
        let mut narrator = ConsoleNarrator::new(Vec::new(), true);
        narrator.play_cue(Cue::MenuNav);
        narrator.speak("Main Menu");

        let text = String::from_utf8(narrator.into_inner()).unwrap();
        assert_eq!(text, "[menu_nav]\nMain Menu\n");
    }

    #[test]
    fn test_console_narrator_hides_cues() {
        let mut narrator = ConsoleNarrator::new(Vec::new(), false);
        narrator.play_cue(Cue::MenuNav);
        narrator.speak("Main Menu");

        let text = String::from_utf8(narrator.into_inner()).unwrap();
        assert_eq!(text, "Main Menu\n");
    }

    #[test]
    fn test_provider_chain_skips_unavailable() {
        let chain = ProviderChain::new(vec![Box::new(Unavailable), Box::new(LogNarrator)]);
        assert_eq!(chain.active_name(), "log");

        let mut chain = chain;
        chain.speak("routed to log");
        chain.play_cue(Cue::ActionSuccess);
    }

    #[test]
    fn test_provider_chain_routes_to_first_available() {
        let first = Rc::new(RefCell::new(RecordingNarrator::new()));
        let second = Rc::new(RefCell::new(RecordingNarrator::new()));
        let mut chain = ProviderChain::new(vec![
            Box::new(Unavailable),
            Box::new(Shared(Rc::clone(&first))),
            Box::new(Shared(Rc::clone(&second))),
        ]);
        assert_eq!(chain.active_name(), "shared");

        chain.play_cue(Cue::TurretShoot);
        chain.speak("Wave 3 incoming");

        let routed = first.borrow();
        assert!(routed.played(Cue::TurretShoot));
        assert!(routed.heard("Wave 3 incoming"));
        assert!(second.borrow().events().is_empty());
    }

    #[test]
    fn test_provider_chain_falls_back_to_console() {
        let chain = ProviderChain::new(vec![Box::new(Unavailable)]);
        assert_eq!(chain.active_name(), "console");
    }

    #[test]
    fn test_gated_narrator_respects_settings() {
        let settings = AudioSettings {
            enable_sounds: false,
            ..AudioSettings::default()
        };
        let mut narrator = GatedNarrator::new(RecordingNarrator::new(), settings);
        narrator.play_cue(Cue::TurretMove);
        narrator.speak("still spoken");

        let inner = narrator.into_inner();
        assert!(!inner.played(Cue::TurretMove));
        assert!(inner.heard("still spoken"));
    }

    #[test]
    fn test_gated_narrator_pause_drops_speech() {
        let mut narrator = GatedNarrator::new(RecordingNarrator::new(), AudioSettings::default());
        narrator.pause();
        assert!(narrator.is_paused());
        narrator.speak("dropped");
        narrator.play_cue(Cue::EnemyHit);
        narrator.resume();
        narrator.speak("kept");

        let inner = narrator.into_inner();
        assert!(!inner.heard("dropped"));
        assert!(inner.heard("kept"));
        assert!(inner.played(Cue::EnemyHit));
    }
}
