use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::frame::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    ContactBegin,
    ContactEnd,
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundCue::ContactBegin => f.write_str("contact begin"),
            SoundCue::ContactEnd => f.write_str("contact end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoundError {
    #[error("no free channel")]
    NoFreeChannel,
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Fire-and-forget audio output with a fixed number of channels.
pub trait Mixer {
    fn channels(&self) -> usize;

    /// Number of channels currently playing.
    fn playing(&self) -> usize;

    /// Starts `cue` on any free channel.
    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError>;
}

/// Plays `cue` if a channel is free and drops it otherwise. Never blocks, never queues.
pub fn play_cue<M: Mixer + ?Sized>(mixer: &mut M, cue: SoundCue) {
    if mixer.playing() < mixer.channels() {
        if let Err(e) = mixer.play(cue) {
            warn!("Failed to play {} sound: {}", cue, e);
        }
    } else {
        info!("No more free channels, not adding new {} sound", cue);
    }
}

/// Software channel pool: each cue occupies a channel for its clip length, measured on `clock`.
pub struct ChannelPool<C> {
    clock: C,
    busy_until: Vec<Option<u64>>,
    begin_clip_ms: u64,
    end_clip_ms: u64,
}

impl<C: Clock> ChannelPool<C> {
    pub fn new(clock: C, channels: usize, begin_clip_ms: u64, end_clip_ms: u64) -> Self {
        Self {
            clock,
            busy_until: vec![None; channels],
            begin_clip_ms,
            end_clip_ms,
        }
    }

    fn clip_ms(&self, cue: SoundCue) -> u64 {
        match cue {
            SoundCue::ContactBegin => self.begin_clip_ms,
            SoundCue::ContactEnd => self.end_clip_ms,
        }
    }
}

impl<C: Clock> Mixer for ChannelPool<C> {
    fn channels(&self) -> usize {
        self.busy_until.len()
    }

    fn playing(&self) -> usize {
        let now = self.clock.now_ms();
        self.busy_until
            .iter()
            .filter(|until| until.is_some_and(|t| t > now))
            .count()
    }

    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError> {
        let now = self.clock.now_ms();
        let until = now + self.clip_ms(cue);
        let (channel, slot) = self
            .busy_until
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.map_or(true, |t| t <= now))
            .ok_or(SoundError::NoFreeChannel)?;
        *slot = Some(until);
        debug!("Playing {} sound on channel {} until {}ms", cue, channel, until);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tracing_test::traced_test;

    struct FakeClock(Cell<u64>);

    impl Clock for FakeClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    #[derive(Default)]
    struct Saturated {
        attempts: usize,
    }

    impl Mixer for Saturated {
        fn channels(&self) -> usize {
            2
        }

        fn playing(&self) -> usize {
            2
        }

        fn play(&mut self, _cue: SoundCue) -> Result<(), SoundError> {
            self.attempts += 1;
            Ok(())
        }
    }

    #[test]
    fn channels_free_up_after_clip_length() {
        let clock = FakeClock(Cell::new(0));
        let mut pool = ChannelPool::new(&clock, 2, 100, 300);

        pool.play(SoundCue::ContactBegin).unwrap();
        pool.play(SoundCue::ContactEnd).unwrap();
        assert_eq!(pool.playing(), 2);
        assert_eq!(pool.play(SoundCue::ContactBegin), Err(SoundError::NoFreeChannel));

        clock.0.set(100);
        assert_eq!(pool.playing(), 1);
        pool.play(SoundCue::ContactBegin).unwrap();

        clock.0.set(250);
        assert_eq!(pool.playing(), 1);
        clock.0.set(300);
        assert_eq!(pool.playing(), 0);
    }

    #[test]
    #[traced_test]
    fn full_mixer_drops_the_cue() {
        let mut mixer = Saturated::default();
        play_cue(&mut mixer, SoundCue::ContactEnd);
        assert_eq!(mixer.attempts, 0);
        assert!(logs_contain("No more free channels"));
    }

    #[test]
    fn free_channel_plays_the_cue() {
        let clock = FakeClock(Cell::new(10));
        let mut pool = ChannelPool::new(&clock, 1, 50, 50);
        play_cue(&mut pool, SoundCue::ContactBegin);
        assert_eq!(pool.playing(), 1);
        play_cue(&mut pool, SoundCue::ContactBegin);
        assert_eq!(pool.playing(), 1);
    }
}
