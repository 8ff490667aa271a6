//! Thread cutting example.
//!
//! Simulates an 800-count spindle encoder at 300 RPM driving the leadscrew on a
//! 20 TPI thread (6400 steps/s against the 10 kHz drive limit). The encoder pipeline runs in "interrupt" calls, the
//! controller and diagnostics in the main loop, exactly as on the target.
//!
//! A left limit is set after 10 revolutions, one A edge is dropped during
//! revolution 14 to show lost-step detection, and the feed is reversed for the
//! last five revolutions to back away from the limit.
//!
//! Run with: `cargo run --example thread_cutting`

use els_sync::{
    diagnostics::should_report, Command, DiagnosticMailbox, DiagnosticReporter, FeedMode,
    FeedSelection, LeadscrewController, Micros, Phase, PulseOutput, Result, SharedCell, Side,
    SpindleEncoder, SpindleReading,
};

const CONFIG: &str = r#"
[encoder]
counts_per_revolution = 800
calibration_samples = 10
verbosity = "medium"

[leadscrew]
threads_per_inch = 8
driver_steps_per_revolution = 400
step_ratio = 8
"#;

/// Mock STEP/DIR pin for demonstration.
struct MockPin;

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Mock delay; simulated time does not advance while pulsing.
struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

static SPINDLE: SharedCell<SpindleReading> = SharedCell::new(SpindleReading::ZERO);

fn main() -> Result<()> {
    println!("=== Thread Cutting Example ===\n");

    let config = els_sync::parse_config(CONFIG)?;
    let cpr = config.counts_per_revolution();

    let mut mailbox = DiagnosticMailbox::new();
    let (producer, mut consumer) = mailbox.split();
    let mut encoder = SpindleEncoder::new(&config.encoder, Phase::default(), producer, &SPINDLE);

    let output = PulseOutput::new(MockPin, MockPin, MockDelay, &config.leadscrew);
    let mut els = LeadscrewController::from_config(
        &config,
        FeedSelection::new(FeedMode::Inch, 51),
        output,
        &SPINDLE,
    )?;
    let mut reporter = DiagnosticReporter::new(config.encoder.verbosity);

    let entry = els.entry()?;
    println!(
        "Feed: {} TPI, {} steps per spindle revolution",
        entry.pitch.unwrap_or("-"),
        entry.steps_per_revolution
    );

    // Carriage zero at the start of the thread
    els.tick(Micros(0))?;
    els.apply(Command::ZeroPosition)?;

    // 300 RPM: 200ms per revolution, 1600 A/B edges
    let revolution_us: u64 = 200_000;
    let edges = cpr as u64 * 2;
    let mut phase = Phase::default();
    let mut now: u64 = 0;

    encoder.on_z(Micros(0));
    for revolution in 1..=20u64 {
        let start = now;
        for k in 1..=edges {
            now = start + revolution_us * k / edges;
            let at = Micros(now as u32);
            phase = phase.forward();

            let is_a = matches!(phase.bits(), 2 | 1);
            if revolution == 14 && k == 801 {
                // Interrupt lost: phase advances, handler never runs
                continue;
            }
            if is_a {
                encoder.on_a(at, phase);
            } else {
                encoder.on_b(at, phase);
            }

            // Main loop between interrupts
            let mut tick = now;
            while els.tick(Micros(tick as u32))?.is_some() {
                tick += 30;
            }
        }
        encoder.on_z(Micros(now as u32));

        if let Some(snapshot) = consumer.poll() {
            if should_report(&snapshot, reporter.verbosity()) {
                println!(
                    "rev {:>2}: {} rpm, conditions: {:?}",
                    snapshot.revolution,
                    snapshot.rpm(),
                    snapshot.conditions()
                );
            }
            reporter.report(&snapshot);
        }

        let state = els.state();
        if let Some(fault) = state.fault {
            println!("rev {:>2}: feed halted by {:?}", revolution, fault);
        }

        if revolution == 10 {
            println!("Setting left limit at {} steps", state.carriage.position().value());
            els.apply(Command::SetLimit(Side::Left))?;
        }
        if revolution == 15 {
            println!(
                "Left limit engaged: {}, reversing feed",
                state.carriage.is_limited(Side::Left)
            );
            els.apply(Command::SetFeedLeft(false))?;
        }
    }

    let state = els.state();
    println!("\nCarriage position: {} steps", state.carriage.position().value());
    println!("Left limit engaged: {}", state.carriage.is_limited(Side::Left));
    println!("Step rate fault: {:?}", state.fault);
    println!("Conditions: {:?}", state.conditions());
    println!("Pulses emitted: {}", els.output().pulses());
    println!("Snapshots reported: {}", reporter.reported());

    println!("\n=== Example Complete ===");
    Ok(())
}
