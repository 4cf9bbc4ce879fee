// Gesture demo: run the hand through its preset poses
//
// IMPORTANT: Run hand_diagnostic FIRST to verify read-only communication.
//
// Usage: cargo run --example gesture_demo -- --port /dev/ttyUSB0 --side 2
//
// Safety features:
// - Explicit confirmation before any writes
// - Ends in the open rest pose with motors freed

use std::io::{self, Write};
use std::thread::sleep;
use std::time::Duration;

use clap::Parser;

use amazing_hand::{CalibrationTable, Gesture, HandConfig, HandController, Side};

#[derive(Parser, Debug)]
#[command(name = "gesture_demo")]
#[command(about = "Run the hand through its preset gestures")]
struct Args {
    /// Serial port of the hand
    #[arg(long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Hand side: 1 = right, 2 = left
    #[arg(long, default_value_t = 1)]
    side: u8,

    /// Calibration offsets as a JSON list of 8 integers,
    /// e.g. "[3,0,-5,-8,-2,5,-12,0]"
    #[arg(long)]
    calibration: Option<String>,

    /// Run a single gesture instead of the whole sequence
    #[arg(long)]
    gesture: Option<String>,

    /// Seconds to hold each pose
    #[arg(long, default_value_t = 2.0)]
    hold: f32,
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush().unwrap();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().eq_ignore_ascii_case("y")
}

fn parse_gesture(name: &str) -> Option<Gesture> {
    Gesture::ALL.into_iter().find(|g| g.to_string() == name)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let side = Side::from_flag(args.side)?;
    let mut config = HandConfig::new(&args.port).with_side(side);
    if let Some(raw) = &args.calibration {
        let offsets: Vec<i16> = serde_json::from_str(raw)?;
        config = config.with_calibration(CalibrationTable::from_slice(&offsets)?);
    }

    let gestures: Vec<Gesture> = match &args.gesture {
        Some(name) => {
            let gesture = parse_gesture(name).ok_or_else(|| {
                format!("unknown gesture {name:?} (try open, close, point, victory, ok, pinch)")
            })?;
            vec![gesture]
        }
        None => Gesture::ALL.to_vec(),
    };

    println!("Hand:     {:?} side on {}", side, args.port);
    println!(
        "Gestures: {}",
        gestures
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();
    println!("⚠  This tool WILL move the fingers!");

    if !confirm("Is the hand clear of cables, people, and the table?") {
        println!("Aborted.");
        return Ok(());
    }
    println!();

    println!("Connecting...");
    let mut hand = HandController::connect(config)?;
    hand.start()?;
    println!("✓ Torque enabled");
    println!();

    for gesture in gestures {
        println!("  -> {}", gesture);
        hand.perform(gesture)?;
        sleep(Duration::from_secs_f32(args.hold));
    }

    // Leave the hand in a neutral pose before freeing it
    println!("  -> open (rest)");
    hand.open()?;
    sleep(Duration::from_secs_f32(args.hold));

    println!();
    println!("Final status:");
    println!("{}", serde_json::to_string_pretty(&hand.get_all_status())?);

    hand.stop()?;
    println!("✓ Motors freed");

    Ok(())
}
