//! Edge capture: turns A/B/Z interrupts into counters and spindle position.

use crate::config::units::Micros;

use super::quadrature::{Channel, Phase, QuadratureDecoder, Transition};

/// Spindle angle as seen by the step generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpindleReading {
    /// Position within the revolution, in `[0, counts_per_revolution)`.
    pub position: u16,
    /// Timestamp of the edge that produced this position, `None` before the
    /// first A edge.
    pub at: Option<Micros>,
}

impl SpindleReading {
    /// Position zero, no edge seen yet.
    pub const ZERO: Self = Self {
        position: 0,
        at: None,
    };

    /// Reading produced by an edge at `at`.
    #[inline]
    pub const fn at_edge(position: u16, at: Micros) -> Self {
        Self {
            position,
            at: Some(at),
        }
    }
}

/// Result of one A or B edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    /// Line that fired.
    pub channel: Channel,
    /// Edge timestamp.
    pub at: Micros,
    /// Decoded transition.
    pub transition: Transition,
    /// Lifetime edge count of the channel, including this edge.
    pub lifetime: u32,
}

/// A revolution closed by a Z edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RevolutionReport {
    /// Index of the closing Z edge, 1 for the first complete revolution.
    pub index: u32,
    /// Time since the previous Z edge.
    pub interval: Micros,
    /// A edges counted during the revolution.
    pub a_count: u32,
    /// B edges counted during the revolution.
    pub b_count: u32,
}

/// Interrupt-context edge capture.
#[derive(Debug, Clone)]
pub struct QuadratureEdgeCapture {
    counts_per_revolution: u16,
    decoder: QuadratureDecoder,
    position: u16,
    last_edge: Option<Micros>,
    a_lifetime: u32,
    b_lifetime: u32,
    a_revolution: u32,
    b_revolution: u32,
    last_z: Option<Micros>,
    revolutions: u32,
}

impl QuadratureEdgeCapture {
    /// Create a capture for the given resolution, starting at position 0.
    ///
    /// `initial` is the A/B state sampled before interrupts are enabled.
    pub const fn new(counts_per_revolution: u16, initial: Phase) -> Self {
        Self {
            counts_per_revolution,
            decoder: QuadratureDecoder::new(initial),
            position: 0,
            last_edge: None,
            a_lifetime: 0,
            b_lifetime: 0,
            a_revolution: 0,
            b_revolution: 0,
            last_z: None,
            revolutions: 0,
        }
    }

    /// A-line edge with the A/B levels sampled in the handler.
    #[inline]
    pub fn on_a(&mut self, at: Micros, phase: Phase) -> EdgeEvent {
        self.a_lifetime = self.a_lifetime.wrapping_add(1);
        self.a_revolution = self.a_revolution.wrapping_add(1);
        let transition = self.decoder.decode(Channel::A, phase);
        self.advance(transition);
        self.last_edge = Some(at);
        EdgeEvent {
            channel: Channel::A,
            at,
            transition,
            lifetime: self.a_lifetime,
        }
    }

    /// B-line edge. Checked for decode legality only; does not move the position.
    #[inline]
    pub fn on_b(&mut self, at: Micros, phase: Phase) -> EdgeEvent {
        self.b_lifetime = self.b_lifetime.wrapping_add(1);
        self.b_revolution = self.b_revolution.wrapping_add(1);
        let transition = self.decoder.decode(Channel::B, phase);
        EdgeEvent {
            channel: Channel::B,
            at,
            transition,
            lifetime: self.b_lifetime,
        }
    }

    /// Z-line edge.
    ///
    /// Resets the per-revolution counters. Returns `None` for the first Z
    /// edge, which only opens the first revolution.
    pub fn on_z(&mut self, at: Micros) -> Option<RevolutionReport> {
        let a_count = core::mem::take(&mut self.a_revolution);
        let b_count = core::mem::take(&mut self.b_revolution);
        let previous = self.last_z.replace(at)?;

        self.revolutions = self.revolutions.wrapping_add(1);
        Some(RevolutionReport {
            index: self.revolutions,
            interval: at.since(previous),
            a_count,
            b_count,
        })
    }

    /// Spindle position in `[0, counts_per_revolution)`.
    #[inline]
    pub fn position(&self) -> u16 {
        self.position
    }

    /// Position together with the time of the last A edge.
    #[inline]
    pub fn reading(&self) -> SpindleReading {
        SpindleReading {
            position: self.position,
            at: self.last_edge,
        }
    }

    /// Lifetime edge count of a channel.
    #[inline]
    pub fn lifetime(&self, channel: Channel) -> u32 {
        match channel {
            Channel::A => self.a_lifetime,
            Channel::B => self.b_lifetime,
        }
    }

    /// Edges counted so far in the open revolution.
    #[inline]
    pub fn revolution_counts(&self) -> (u32, u32) {
        (self.a_revolution, self.b_revolution)
    }

    /// Completed revolutions.
    #[inline]
    pub fn revolutions(&self) -> u32 {
        self.revolutions
    }

    /// Encoder resolution.
    #[inline]
    pub fn counts_per_revolution(&self) -> u16 {
        self.counts_per_revolution
    }

    fn advance(&mut self, transition: Transition) {
        let cpr = self.counts_per_revolution as u32;
        if cpr == 0 {
            return;
        }
        let position = self.position as u32;
        self.position = match transition {
            Transition::Forward => ((position + 1) % cpr) as u16,
            Transition::Reverse => ((position + cpr - 1) % cpr) as u16,
            Transition::Idle | Transition::Illegal => self.position,
        };
    }
}
