//! Sound cue routing
//!
//! The cores emit events; this module turns them into cues for whatever
//! audio backend the host provides. Playback failures are logged and
//! dropped so they never reach game logic.

use std::fmt;

use crate::arcade::ArcadeEvent;
use crate::match3::MatchEvent;
use crate::memory::MemoryEvent;
use crate::settings::AudioSettings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits a wall or the ceiling
    WallHit,
    /// Brick destroyed
    BrickBreak,
    /// Bomb brick
    Explosion,
    /// One ball fell out, others remain
    BallLost,
    GameOver,
    LevelClear,
    /// Direct match-three clear
    TilesCleared,
    /// Cascade clear
    Chain,
    CardFlip,
    PairMatched,
}

impl SoundCue {
    /// Asset name a file-based backend would look up
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundCue::PaddleHit => "paddle_hit",
            SoundCue::WallHit => "wall_hit",
            SoundCue::BrickBreak => "brick_break",
            SoundCue::Explosion => "explosion",
            SoundCue::BallLost => "ball_lost",
            SoundCue::GameOver => "game_over",
            SoundCue::LevelClear => "level_clear",
            SoundCue::TilesCleared => "tiles_cleared",
            SoundCue::Chain => "chain",
            SoundCue::CardFlip => "card_flip",
            SoundCue::PairMatched => "pair_matched",
        }
    }

    /// Relative loudness of the cue before user volume is applied
    fn gain(&self) -> f32 {
        match self {
            SoundCue::WallHit | SoundCue::CardFlip => 0.3,
            SoundCue::PaddleHit => 0.6,
            SoundCue::Explosion | SoundCue::GameOver => 1.0,
            _ => 0.5,
        }
    }

    /// Cue for an arcade event, if it has one
    pub fn for_arcade(event: &ArcadeEvent) -> Option<Self> {
        match event {
            ArcadeEvent::WallBounce => Some(SoundCue::WallHit),
            ArcadeEvent::Bounce => Some(SoundCue::PaddleHit),
            ArcadeEvent::BrickDestroyed { .. } => Some(SoundCue::BrickBreak),
            ArcadeEvent::Explosion { .. } => Some(SoundCue::Explosion),
            ArcadeEvent::BallLost { .. } => Some(SoundCue::BallLost),
            ArcadeEvent::AllBallsLost => Some(SoundCue::GameOver),
            ArcadeEvent::LevelCleared { .. } => Some(SoundCue::LevelClear),
            ArcadeEvent::MultiBallSpawned { .. } | ArcadeEvent::LevelStarted { .. } => None,
        }
    }

    pub fn for_match(event: &MatchEvent) -> Option<Self> {
        match event {
            MatchEvent::RunsCleared { pass: 0, .. } | MatchEvent::SelectionMatched { .. } => {
                Some(SoundCue::TilesCleared)
            }
            MatchEvent::RunsCleared { .. } => Some(SoundCue::Chain),
            MatchEvent::LevelUp { .. } => Some(SoundCue::LevelClear),
            MatchEvent::GameOver => Some(SoundCue::GameOver),
            _ => None,
        }
    }

    pub fn for_memory(event: &MemoryEvent) -> Option<Self> {
        match event {
            MemoryEvent::Flipped { .. } => Some(SoundCue::CardFlip),
            MemoryEvent::PairMatched { .. } => Some(SoundCue::PairMatched),
            MemoryEvent::LevelUp { .. } => Some(SoundCue::LevelClear),
            _ => None,
        }
    }
}

/// Why a cue could not be played
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No sound asset is registered for the cue
    MissingAsset(&'static str),
    /// Backend refused or failed playback
    Backend(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::MissingAsset(name) => write!(f, "missing sound asset '{}'", name),
            AudioError::Backend(msg) => write!(f, "audio backend error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Audio backend supplied by the host
pub trait AudioSink {
    /// Play `cue` at `volume` (0.0 - 1.0)
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError>;
}

/// Routes core events to an [`AudioSink`] with user volume applied
pub struct AudioRouter<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    failures: u64,
}

impl<S: AudioSink> AudioRouter<S> {
    pub fn new(sink: S, settings: &AudioSettings) -> Self {
        let mut router = Self {
            sink,
            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
            failures: 0,
        };
        router.apply_settings(settings);
        router
    }

    pub fn apply_settings(&mut self, settings: &AudioSettings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Playback failures seen so far
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Play a cue. Silent when muted; failures are logged, never returned.
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume() * cue.gain();
        if vol <= 0.0 {
            return;
        }
        if let Err(e) = self.sink.play(cue, vol) {
            self.failures += 1;
            log::warn!("Failed to play {:?}: {}", cue, e);
        }
    }

    pub fn arcade_events(&mut self, events: &[ArcadeEvent]) {
        for cue in events.iter().filter_map(SoundCue::for_arcade) {
            self.play(cue);
        }
    }

    pub fn match_events(&mut self, events: &[MatchEvent]) {
        for cue in events.iter().filter_map(SoundCue::for_match) {
            self.play(cue);
        }
    }

    pub fn memory_events(&mut self, events: &[MemoryEvent]) {
        for cue in events.iter().filter_map(SoundCue::for_memory) {
            self.play(cue);
        }
    }
}
