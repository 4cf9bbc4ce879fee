// Keyboard teleop: O/C/P/V/K/N gestures, Up/Down curl the index, Q quit
//
// Usage: cargo run --example finger_teleop -- [port] [side]

use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::info;

use amazing_hand::hand::MAX_SPEED;
use amazing_hand::{Gesture, HandConfig, HandController, Side};

const CURL_STEP: f32 = 10.0; // degrees per keypress
const CURL_MIN: f32 = -40.0; // fully extended
const CURL_MAX: f32 = 90.0; // fully curled

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let side_flag: u8 = std::env::args()
        .nth(2)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(1);

    let config = HandConfig::new(&port).with_side(Side::from_flag(side_flag)?);

    info!("Connecting to hand on {}...", port);
    let mut hand = HandController::connect(config)?;
    hand.start()?;

    info!("Controls: o=open c=close p=point v=victory k=ok n=pinch");
    info!("          Up/Down=curl index, s=status, q=quit");

    enable_raw_mode()?;
    let result = run_teleop(&mut hand);
    disable_raw_mode()?;

    hand.stop()?;
    result
}

fn run_teleop(hand: &mut HandController) -> Result<(), Box<dyn std::error::Error>> {
    let mut index_angle: f32 = CURL_MIN;

    loop {
        // Poll for key with 50ms timeout
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
            continue;
        };
        if kind != KeyEventKind::Press && kind != KeyEventKind::Repeat {
            continue;
        }

        let gesture = match code {
            KeyCode::Char('o') => Some(Gesture::Open),
            KeyCode::Char('c') => Some(Gesture::Close),
            KeyCode::Char('p') => Some(Gesture::Point),
            KeyCode::Char('v') => Some(Gesture::Victory),
            KeyCode::Char('k') => Some(Gesture::Ok),
            KeyCode::Char('n') => Some(Gesture::Pinch),
            _ => None,
        };

        if let Some(gesture) = gesture {
            info!("Gesture: {}", gesture);
            hand.perform(gesture)?;
            continue;
        }

        match code {
            KeyCode::Up => {
                index_angle = (index_angle - CURL_STEP).max(CURL_MIN);
                info!("Index: {:.0} deg", index_angle);
                hand.index(index_angle, -index_angle, MAX_SPEED)?;
            }
            KeyCode::Down => {
                index_angle = (index_angle + CURL_STEP).min(CURL_MAX);
                info!("Index: {:.0} deg", index_angle);
                hand.index(index_angle, -index_angle, MAX_SPEED)?;
            }
            KeyCode::Char('s') => {
                for status in hand.get_all_status() {
                    match status.reading() {
                        Some(r) => info!(
                            "motor {}: {:>6.1} deg, {:.1} V, {} C",
                            r.id, r.position_deg, r.voltage_v, r.temperature_c
                        ),
                        None => info!(
                            "motor {}: {}",
                            status.id(),
                            status.error().unwrap_or("unknown")
                        ),
                    }
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => break,
            _ => {}
        }
    }

    Ok(())
}
