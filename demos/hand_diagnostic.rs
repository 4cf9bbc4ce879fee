// Hand diagnostic: READ-ONLY check of the servo chain
//
// This tool does NOT write anything to the motors - it's completely safe.
// Use it first to confirm wiring and ids before running gesture_demo.
//
// Usage: cargo run --example hand_diagnostic -- [port]
// Example: cargo run --example hand_diagnostic -- /dev/ttyUSB0

use amazing_hand::{HandConfig, HandController, MotorId};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("debug".parse().unwrap()),
        )
        .init();

    // Get port from args or use default
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║             Hand Diagnostic (READ-ONLY)                      ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  This tool only READS from motors - no writes, no movement   ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Serial port: {}", port);
    println!();

    println!("Step 1: Opening serial port...");
    let mut hand = match HandController::connect(HandConfig::new(&port)) {
        Ok(hand) => {
            println!("  ✓ Serial port opened successfully");
            hand
        }
        Err(e) => {
            println!("  ✗ Failed to open serial port: {}", e);
            println!();
            println!("Troubleshooting:");
            println!("  - Check the port path is correct");
            println!("  - Verify the USB cable is connected");
            println!("  - Make sure no other program is holding the port");
            return Err(e.into());
        }
    };
    println!();

    println!("Step 2: Probing motors 1..=8...");
    let present = hand.probe()?;
    for id in MotorId::ALL {
        if present.contains(&id) {
            println!("  Motor {}: ✓ RESPONDING", id);
        } else {
            println!("  Motor {}: ✗ NO RESPONSE", id);
        }
    }
    println!();

    if present.len() < MotorId::ALL.len() {
        println!("⚠ WARNING: Not all motors responded!");
        println!("  - Check the servo power supply");
        println!("  - The chain daisy-chains 1 through 8; a break hides everything");
        println!("    after the last responding id");
        println!();
    }

    println!("Step 3: Reading telemetry...");
    println!();
    println!("   id   position    speed    load  voltage  temperature");
    for status in hand.get_all_status() {
        match status.reading() {
            Some(r) => println!(
                "  {:>3}  {:>8.1}°  {:>6}  {:>6}  {:>6.1}V  {:>10}°C",
                r.id, r.position_deg, r.speed, r.load, r.voltage_v, r.temperature_c
            ),
            None => println!(
                "  {:>3}  ERROR - {}",
                status.id(),
                status.error().unwrap_or("unknown")
            ),
        }
    }
    println!();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Diagnostic Complete                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("If all motors responded and show reasonable values:");
    println!("  1. Voltage should be close to the supply (around 7.4V on 2S)");
    println!("  2. Positions should sit near the resting pose, not at ±150°");
    println!();
    println!("Next step: run 'cargo run --example gesture_demo -- --port {}'", port);
    println!("with the fingers clear.");

    Ok(())
}
