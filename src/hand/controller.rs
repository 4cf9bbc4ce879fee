// Hand controller.
//
// Drives the eight-servo hand over a ServoBus: torque lifecycle,
// per-finger moves, gesture presets, and telemetry. Commands are paced
// to keep the half-duplex chain happy, and goals go through the
// calibration table so callers work in ideal-hand angles.

use std::thread;

use tracing::{debug, info, warn};

use crate::bus::protocol::{self, Register, TorqueMode};
use crate::bus::scs::ScsBus;
use crate::bus::units;
use crate::bus::{MotorId, ServoBus};
use crate::config::HandConfig;
use crate::error::HandError;
use crate::hand::{Finger, Gesture, Side};
use crate::status::{MotorReading, MotorStatus};

/// Controller lifecycle. Motion commands are only legal while
/// `Started`; telemetry works in any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandState {
    Created,
    Started,
    Stopped,
}

/// One motor's commanded goal with calibration applied, as it goes to
/// the bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalCommand {
    pub id: MotorId,
    pub angle_deg: f32,
    pub speed: u16,
}

impl GoalCommand {
    /// Tick value this goal puts in the position register.
    pub fn position_ticks(&self) -> u16 {
        units::deg_to_ticks(self.angle_deg)
    }
}

/// Controller for one hand.
pub struct HandController<B: ServoBus = ScsBus> {
    bus: B,
    config: HandConfig,
    state: HandState,
}

impl HandController {
    /// Open the serial port named in the config and build a controller
    /// around it. Torque stays off until `start`.
    pub fn connect(config: HandConfig) -> Result<Self, HandError> {
        info!("Connecting to hand on {} ({} baud)", config.port, config.baud_rate);
        let bus = ScsBus::open_with(&config.port, config.baud_rate, config.read_timeout)?;
        Ok(Self::with_bus(bus, config))
    }
}

impl<B: ServoBus> HandController<B> {
    /// Build a controller over an existing bus.
    pub fn with_bus(bus: B, config: HandConfig) -> Self {
        Self {
            bus,
            config,
            state: HandState::Created,
        }
    }

    pub fn state(&self) -> HandState {
        self.state
    }

    pub fn side(&self) -> Side {
        self.config.side
    }

    pub fn config(&self) -> &HandConfig {
        &self.config
    }

    fn require_started(&self, operation: &'static str) -> Result<(), HandError> {
        if self.state == HandState::Started {
            Ok(())
        } else {
            Err(HandError::IllegalState {
                state: self.state,
                operation,
            })
        }
    }

    fn pace(&self) {
        if !self.config.inter_command_spacing.is_zero() {
            thread::sleep(self.config.inter_command_spacing);
        }
    }

    fn settle(&self) {
        if !self.config.settle_delay.is_zero() {
            thread::sleep(self.config.settle_delay);
        }
    }

    fn sweep_torque(&mut self, mode: TorqueMode) -> Result<(), HandError> {
        for id in MotorId::ALL {
            self.bus.write_register(id, Register::TorqueEnable, mode as u16)?;
            self.pace();
        }
        Ok(())
    }

    /// Enable torque on every motor, in ascending id order. Legal from
    /// `Created` or `Stopped`; starting a started hand is an error. On
    /// failure partway through, the state is left unchanged.
    pub fn start(&mut self) -> Result<(), HandError> {
        if self.state == HandState::Started {
            return Err(HandError::IllegalState {
                state: self.state,
                operation: "start",
            });
        }

        info!("Starting hand, enabling torque on all motors");
        self.sweep_torque(TorqueMode::On)?;
        self.state = HandState::Started;
        Ok(())
    }

    /// Free every motor (torque off, shafts compliant), in ascending id
    /// order. Only legal while started.
    pub fn stop(&mut self) -> Result<(), HandError> {
        self.require_started("stop")?;

        info!("Stopping hand, freeing all motors");
        self.sweep_torque(TorqueMode::Free)?;
        self.state = HandState::Stopped;
        Ok(())
    }

    /// The two per-motor goals a finger command resolves to, with
    /// calibration applied. Lets callers preview a move without
    /// touching the bus.
    pub fn goal(&self, finger: Finger, angles: [f32; 2], speed: u16) -> [GoalCommand; 2] {
        let (a, b) = finger.motor_pair();
        [
            GoalCommand {
                id: a,
                angle_deg: angles[0] + self.config.calibration.offset_deg(a),
                speed,
            },
            GoalCommand {
                id: b,
                angle_deg: angles[1] + self.config.calibration.offset_deg(b),
                speed,
            },
        ]
    }

    /// Move one finger to a pair of servo angles at the given speed.
    ///
    /// Both speed registers are written before either position
    /// register, so the pair starts moving on matched speeds.
    pub fn move_finger(
        &mut self,
        finger: Finger,
        angles: [f32; 2],
        speed: u16,
    ) -> Result<(), HandError> {
        self.require_started("move a finger")?;

        let goals = self.goal(finger, angles, speed);
        debug!(
            "Moving {:?}: motor {} -> {:.1} deg, motor {} -> {:.1} deg at speed {}",
            finger, goals[0].id, goals[0].angle_deg, goals[1].id, goals[1].angle_deg, speed
        );

        for goal in &goals {
            self.bus.write_register(goal.id, Register::GoalSpeed, goal.speed)?;
        }
        for goal in &goals {
            self.bus
                .write_register(goal.id, Register::GoalPosition, goal.position_ticks())?;
        }
        self.settle();
        Ok(())
    }

    pub fn index(&mut self, angle_a: f32, angle_b: f32, speed: u16) -> Result<(), HandError> {
        self.move_finger(Finger::Index, [angle_a, angle_b], speed)
    }

    pub fn middle(&mut self, angle_a: f32, angle_b: f32, speed: u16) -> Result<(), HandError> {
        self.move_finger(Finger::Middle, [angle_a, angle_b], speed)
    }

    pub fn ring(&mut self, angle_a: f32, angle_b: f32, speed: u16) -> Result<(), HandError> {
        self.move_finger(Finger::Ring, [angle_a, angle_b], speed)
    }

    pub fn thumb(&mut self, angle_a: f32, angle_b: f32, speed: u16) -> Result<(), HandError> {
        self.move_finger(Finger::Thumb, [angle_a, angle_b], speed)
    }

    /// Drive all four fingers into a named pose.
    pub fn perform(&mut self, gesture: Gesture) -> Result<(), HandError> {
        self.require_started("perform a gesture")?;

        info!("Performing {} gesture", gesture);
        for t in gesture.targets(self.config.side) {
            self.move_finger(t.finger, t.angles, t.speed)?;
        }
        Ok(())
    }

    pub fn open(&mut self) -> Result<(), HandError> {
        self.perform(Gesture::Open)
    }

    pub fn close(&mut self) -> Result<(), HandError> {
        self.perform(Gesture::Close)
    }

    pub fn point(&mut self) -> Result<(), HandError> {
        self.perform(Gesture::Point)
    }

    pub fn victory(&mut self) -> Result<(), HandError> {
        self.perform(Gesture::Victory)
    }

    pub fn ok(&mut self) -> Result<(), HandError> {
        self.perform(Gesture::Ok)
    }

    pub fn pinch(&mut self) -> Result<(), HandError> {
        self.perform(Gesture::Pinch)
    }

    /// Present position of one motor, in degrees in the servo frame.
    /// Calibration is not subtracted, so the value compares directly
    /// against what `goal` commanded.
    pub fn read_position(&mut self, id: MotorId) -> Result<f32, HandError> {
        let raw = self.bus.read_register(id, Register::PresentPosition)?;
        Ok(units::ticks_to_deg(raw))
    }

    /// Signed present speed of one motor, raw encoder units.
    pub fn read_speed(&mut self, id: MotorId) -> Result<i16, HandError> {
        let raw = self.bus.read_register(id, Register::PresentSpeed)?;
        Ok(protocol::decode_sign_magnitude(raw, 15))
    }

    /// Signed present load of one motor.
    pub fn read_load(&mut self, id: MotorId) -> Result<i16, HandError> {
        let raw = self.bus.read_register(id, Register::PresentLoad)?;
        Ok(protocol::decode_sign_magnitude(raw, 10))
    }

    pub fn read_voltage(&mut self, id: MotorId) -> Result<f32, HandError> {
        let raw = self.bus.read_register(id, Register::PresentVoltage)?;
        Ok(units::volts_from_raw(raw as u8))
    }

    pub fn read_temperature(&mut self, id: MotorId) -> Result<u8, HandError> {
        let raw = self.bus.read_register(id, Register::PresentTemperature)?;
        Ok(raw as u8)
    }

    /// Full telemetry for one motor.
    pub fn read_motor(&mut self, id: MotorId) -> Result<MotorReading, HandError> {
        Ok(MotorReading {
            id: id.0,
            position_deg: self.read_position(id)?,
            speed: self.read_speed(id)?,
            load: self.read_load(id)?,
            voltage_v: self.read_voltage(id)?,
            temperature_c: self.read_temperature(id)?,
        })
    }

    /// Telemetry sweep over all eight motors. A motor that fails to
    /// answer becomes a failure entry instead of aborting the sweep.
    pub fn get_all_status(&mut self) -> Vec<MotorStatus> {
        MotorId::ALL
            .iter()
            .map(|&id| match self.read_motor(id) {
                Ok(reading) => MotorStatus::Ok(reading),
                Err(e) => {
                    warn!("Status read failed for motor {}: {}", id, e);
                    MotorStatus::Failed {
                        id: id.0,
                        error: e.to_string(),
                    }
                }
            })
            .collect()
    }

    /// Ping every motor and return the ids that answered.
    pub fn probe(&mut self) -> Result<Vec<MotorId>, HandError> {
        let mut present = Vec::new();
        for id in MotorId::ALL {
            if self.bus.ping(id)? {
                present.push(id);
            }
            self.pace();
        }
        Ok(present)
    }
}

impl<B: ServoBus> Drop for HandController<B> {
    fn drop(&mut self) {
        // Free the fingers if the controller goes away while live
        if self.state == HandState::Started {
            if let Err(e) = self.sweep_torque(TorqueMode::Free) {
                warn!("Failed to free motors on drop: {}", e);
            }
        }
    }
}
