//! Quadrature phase decoding.
//!
//! The A/B levels form a 2-bit gray code `(A << 1) | B`. Forward rotation runs
//! `0 -> 2 -> 3 -> 1 -> 0`; reverse runs the same cycle backwards.

use core::fmt;

/// Encoder channel that produced an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel A (counting channel).
    A,
    /// Channel B (quadrature partner).
    B,
}

impl Channel {
    /// Both channels, A first.
    pub const BOTH: [Channel; 2] = [Channel::A, Channel::B];

    /// Phase bit owned by this channel.
    #[inline]
    const fn mask(self) -> u8 {
        match self {
            Channel::A => 0b10,
            Channel::B => 0b01,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::A => write!(f, "A"),
            Channel::B => write!(f, "B"),
        }
    }
}

/// Sampled A/B levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase(u8);

impl Phase {
    /// Build a phase from the two line levels.
    #[inline]
    pub const fn from_levels(a: bool, b: bool) -> Self {
        Self(((a as u8) << 1) | b as u8)
    }

    /// Build a phase from the raw 2-bit value (upper bits ignored).
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11)
    }

    /// Raw 2-bit value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Level of channel A.
    #[inline]
    pub const fn a(self) -> bool {
        self.0 & 0b10 != 0
    }

    /// Level of channel B.
    #[inline]
    pub const fn b(self) -> bool {
        self.0 & 0b01 != 0
    }

    /// Next phase in the forward sequence.
    pub const fn forward(self) -> Self {
        match self.0 {
            0 => Self(2),
            2 => Self(3),
            3 => Self(1),
            _ => Self(0),
        }
    }

    /// Next phase in the reverse sequence.
    pub const fn reverse(self) -> Self {
        match self.0 {
            0 => Self(1),
            1 => Self(3),
            3 => Self(2),
            _ => Self(0),
        }
    }
}

/// Result of comparing two consecutive phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// No change.
    Idle,
    /// One step forward.
    Forward,
    /// One step backward.
    Reverse,
    /// Both bits changed, or the wrong bit changed for the reporting line.
    Illegal,
}

impl Transition {
    /// Position change implied by the transition.
    #[inline]
    pub const fn delta(self) -> i8 {
        match self {
            Transition::Forward => 1,
            Transition::Reverse => -1,
            Transition::Idle | Transition::Illegal => 0,
        }
    }
}

use Transition::{Forward as F, Idle as I, Illegal as X, Reverse as R};

/// `TRANSITIONS[previous][current]`.
const TRANSITIONS: [[Transition; 4]; 4] = [
    [I, R, F, X],
    [F, I, X, R],
    [R, X, I, F],
    [X, F, R, I],
];

/// Look up the transition between two phases.
#[inline]
pub const fn transition(previous: Phase, current: Phase) -> Transition {
    TRANSITIONS[previous.0 as usize][current.0 as usize]
}

/// Stateful decoder holding the last accepted phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    last: Phase,
}

impl QuadratureDecoder {
    /// Create a decoder assuming `initial` as the current line state.
    pub const fn new(initial: Phase) -> Self {
        Self { last: initial }
    }

    /// Last accepted phase.
    #[inline]
    pub const fn phase(&self) -> Phase {
        self.last
    }

    /// Decode an edge reported by `channel` with the levels sampled after it.
    ///
    /// A transition that changes the other channel's bit, or both bits, is
    /// [`Transition::Illegal`]. The decoder always resynchronizes to `phase`.
    pub fn decode(&mut self, channel: Channel, phase: Phase) -> Transition {
        let changed = self.last.0 ^ phase.0;
        let result = if changed == 0 {
            Transition::Idle
        } else if changed != channel.mask() {
            Transition::Illegal
        } else {
            transition(self.last, phase)
        };
        self.last = phase;
        result
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new(Phase::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_cycle() {
        let mut phase = Phase::from_bits(0);
        for _ in 0..4 {
            let next = phase.forward();
            assert_eq!(transition(phase, next), Transition::Forward);
            assert_eq!(transition(next, phase), Transition::Reverse);
            assert_eq!(next.reverse(), phase);
            phase = next;
        }
        assert_eq!(phase, Phase::from_bits(0));
    }

    #[test]
    fn test_diagonal_is_illegal() {
        assert_eq!(transition(Phase::from_bits(0), Phase::from_bits(3)), Transition::Illegal);
        assert_eq!(transition(Phase::from_bits(1), Phase::from_bits(2)), Transition::Illegal);
    }

    #[test]
    fn test_decoder_checks_reporting_line() {
        let mut decoder = QuadratureDecoder::new(Phase::from_levels(false, false));

        // A rises: 0 -> 2 is forward and owned by A
        assert_eq!(decoder.decode(Channel::A, Phase::from_levels(true, false)), Transition::Forward);
        // B reports but A changed back: wrong line
        assert_eq!(decoder.decode(Channel::B, Phase::from_levels(false, false)), Transition::Illegal);
        // Resynchronized, B rises: 0 -> 1 is reverse
        assert_eq!(decoder.decode(Channel::B, Phase::from_levels(false, true)), Transition::Reverse);
        // Repeated sample
        assert_eq!(decoder.decode(Channel::B, Phase::from_levels(false, true)), Transition::Idle);
    }

    #[test]
    fn test_phase_levels() {
        let phase = Phase::from_levels(true, false);
        assert!(phase.a());
        assert!(!phase.b());
        assert_eq!(phase.bits(), 2);
        assert_eq!(Phase::from_bits(0xFF).bits(), 3);
    }
}
