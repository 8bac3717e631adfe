//! cycloid-hw-interface
//!
//! Encoder → menu → speed-synthesis integration firmware for the Raspberry
//! Pi Pico 2. Wires the library crates into the live control loop:
//!
//! 1. The panel encoder is turned or its switch pressed.
//! 2. The control task's 1 kHz poll decodes a debounced, accelerated delta
//!    or a short/long press and dispatches it into the menu state machine,
//!    which mutates the shared `MachineState` mutex.
//! 3. Every 5 ms the same task runs the speed synthesizer over all four
//!    wheels and forwards step rates to the per-wheel pulse tasks through
//!    signals, so a parameter edit is always visible on the next tick and
//!    never mid-tick.
//! 4. A serial task feeds newline-terminated text commands through the same
//!    setter surface the menu uses.
//!
//! Display rendering is external; the control task logs the current 16×2
//! snapshot whenever it changes.

#![no_std]
#![no_main]

use core::fmt::Write as _;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{self, Uart, UartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use cycloid::command::Command;
use cycloid::machine::{MachineState, WHEEL_COUNT, WHEEL_LABELS};
use cycloid_menu_rs::{DisplayLines, MenuStateMachine};
use cycloid_motion_rs::{SpeedSynthesizer, StepperDriver, SynthConfig};
use encoder_sampler::{ButtonConfig, ButtonEvent, ButtonSampler, EncoderSampler, SamplerConfig};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the UART0 peripheral interrupt to Embassy's async handler.
bind_interrupts!(struct Irqs {
    UART0_IRQ => uart::InterruptHandler<UART0>;
});

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Shared machine state — written by the control and serial tasks, read by
/// the synthesizer inside the control task.
static MACHINE: StaticCell<Mutex<CriticalSectionRawMutex, MachineState>> = StaticCell::new();

/// Latest commanded step rate per wheel, control task → pulse tasks.
static RATE_SIGNALS: [Signal<CriticalSectionRawMutex, f32>; WHEEL_COUNT] =
    [Signal::new(), Signal::new(), Signal::new(), Signal::new()];

// ---------------------------------------------------------------------------
// Stepper command fan-out
// ---------------------------------------------------------------------------

/// Forwards synthesizer commands to the per-wheel pulse tasks.
struct SignalStepperBank;

impl StepperDriver for SignalStepperBank {
    fn set_step_rate(&mut self, wheel: usize, steps_per_second: f32) {
        RATE_SIGNALS[wheel].signal(steps_per_second);
    }

    fn stop(&mut self, wheel: usize) {
        RATE_SIGNALS[wheel].signal(0.0);
    }
}

/// Below this magnitude a wheel is treated as stopped.
const IDLE_RATE_THRESHOLD: f32 = 0.001;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Software step-pulse generator for one wheel.
///
/// Toggles the step pin at the commanded rate, updating the direction pin
/// from the rate's sign. A stopped wheel parks on `Signal::wait()` and
/// consumes no cycles until a new rate arrives.
#[embassy_executor::task(pool_size = 4)]
async fn stepper_task(
    mut step_pin: Output<'static>,
    mut dir_pin: Output<'static>,
    rate: &'static Signal<CriticalSectionRawMutex, f32>,
) {
    let mut current = 0.0f32;
    loop {
        if current.abs() < IDLE_RATE_THRESHOLD {
            current = rate.wait().await;
            continue;
        }

        dir_pin.set_level(if current >= 0.0 { Level::High } else { Level::Low });

        // Two edges per step.
        let half_period_us = ((500_000.0 / current.abs()) as u64).max(1);
        match select(rate.wait(), Timer::after(Duration::from_micros(half_period_us))).await {
            Either::First(new_rate) => current = new_rate,
            Either::Second(()) => step_pin.toggle(),
        }
    }
}

/// The cooperative control loop: encoder poll, menu dispatch, synth tick.
///
/// Runs at 1 kHz. The machine mutex is held only for the in-memory
/// mutation or the synthesizer pass — never across an await point that
/// waits on I/O.
#[embassy_executor::task]
async fn control_task(
    enc_a: Input<'static>,
    enc_b: Input<'static>,
    enc_btn: Input<'static>,
    machine: &'static Mutex<CriticalSectionRawMutex, MachineState>,
) {
    info!("control task started");

    let mut sampler = EncoderSampler::new(SamplerConfig::default());
    let mut button = ButtonSampler::new(ButtonConfig::default());
    let mut menu = MenuStateMachine::new();
    let mut synth = SpeedSynthesizer::new(SynthConfig::default());
    let mut driver = SignalStepperBank;

    let synth_interval = Duration::from_millis(SynthConfig::default().tick_interval_ms);
    let mut last_synth = Instant::now();
    let mut last_lines = DisplayLines::default();

    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        ticker.next().await;
        let now_ms = Instant::now().as_millis();

        // Encoder and button pins are active-low.
        let delta = sampler.poll(enc_a.is_low(), enc_b.is_low(), now_ms);
        let press = button.poll(enc_btn.is_low(), now_ms);

        if delta.is_some() || press.is_some() {
            let mut state = machine.lock().await;
            if let Some(delta) = delta {
                menu.handle_delta(delta, &mut state);
            }
            match press {
                Some(ButtonEvent::ShortPress) => menu.handle_short_press(&mut state),
                Some(ButtonEvent::LongPress) => menu.handle_long_press(&mut state),
                None => {}
            }

            let lines = DisplayLines::from_state(&menu, &state);
            drop(state);
            if lines != last_lines {
                info!(
                    "display | {=str} | {=str}",
                    lines.line1.as_str(),
                    lines.line2.as_str()
                );
                last_lines = lines;
            }
        }

        // Timestamp-gated synthesizer tick: skip until the interval since
        // the previous tick has elapsed.
        if Instant::now() - last_synth >= synth_interval {
            let mut state = machine.lock().await;
            synth.tick(&mut state, &mut driver);
            last_synth = Instant::now();
        }
    }
}

/// Serial command task: one text command per line on UART0.
#[embassy_executor::task]
async fn serial_task(
    mut tx: UartTx<'static, uart::Async>,
    mut rx: UartRx<'static, uart::Async>,
    machine: &'static Mutex<CriticalSectionRawMutex, MachineState>,
) {
    info!("serial task started");

    let mut line: heapless::Vec<u8, 96> = heapless::Vec::new();
    let mut byte = [0u8; 1];

    loop {
        if rx.read(&mut byte).await.is_err() {
            warn!("UART read error");
            line.clear();
            continue;
        }

        if byte[0] != b'\n' && byte[0] != b'\r' {
            // Drop oversized lines instead of executing a truncated command.
            if line.push(byte[0]).is_err() {
                warn!("serial line too long, discarded");
                line.clear();
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }

        let reply = match core::str::from_utf8(&line) {
            Ok(text) => execute_line(text, machine).await,
            Err(_) => {
                warn!("serial line is not UTF-8");
                reply_str("ERR invalid input\r\n")
            }
        };
        line.clear();

        if tx.write(reply.as_bytes()).await.is_err() {
            warn!("UART write error");
        }
    }
}

/// Parse and apply one command line, rendering the textual reply.
async fn execute_line(
    text: &str,
    machine: &'static Mutex<CriticalSectionRawMutex, MachineState>,
) -> heapless::String<256> {
    let command = match Command::parse(text) {
        Ok(command) => command,
        Err(e) => {
            warn!("command parse failed: {}", e);
            return reply_str("ERR bad command, try HELP\r\n");
        }
    };

    let mut state = machine.lock().await;
    if let Err(e) = command.apply(&mut state) {
        warn!("command rejected: {}", e);
        return reply_str("ERR rejected\r\n");
    }

    match command {
        Command::Help => help_reply(),
        Command::Status => status_reply(&state),
        _ => reply_str("OK\r\n"),
    }
}

fn reply_str(text: &str) -> heapless::String<256> {
    let mut reply = heapless::String::new();
    let _ = reply.push_str(text);
    reply
}

fn help_reply() -> heapless::String<256> {
    reply_str(
        "Commands: HELP STATUS PAUSE RESUME RESET\r\n\
         MICROSTEP n | SPEED w v | LFO w DEPTH|RATE|POL v\r\n\
         MASTER v | RATIO n   (w: X Y Z A)\r\n",
    )
}

fn status_reply(state: &MachineState) -> heapless::String<256> {
    let mut reply = heapless::String::new();
    let _ = write!(
        reply,
        "{} master {:.2}s microstep {}x\r\n",
        if state.is_paused() { "PAUSED" } else { "RUNNING" },
        state.time_scale(),
        state.microstep().factor(),
    );
    for (label, axis) in WHEEL_LABELS.iter().zip(state.wheels.iter()) {
        let _ = write!(
            reply,
            "{}: speed {:.1} lfo {:.1}%/{:.1} {} ({:.1} sps)\r\n",
            label,
            axis.speed_ratio,
            axis.lfo_depth,
            axis.lfo_rate,
            axis.lfo_polarity.label(),
            axis.last_step_rate,
        );
    }
    reply
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("cycloid-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // UART0 TX → GP0, RX → GP1
    // Step/Dir: X GP2/GP3, Y GP4/GP5, Z GP6/GP7, A GP8/GP9
    // Driver enable (active-low) → GP10
    // Encoder A → GP14, B → GP15, switch → GP16 (all active-low, pull-up)
    // ———————————————————————————————————————————————————————————————————————

    let uart = Uart::new(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart::Config::default(),
    );
    let (tx, rx) = uart.split();

    // Enable the stepper drivers (LOW = enabled). Leaked so the pin keeps
    // its state for the process lifetime.
    let enable = Output::new(p.PIN_10, Level::Low);
    core::mem::forget(enable);

    let enc_a = Input::new(p.PIN_14, Pull::Up);
    let enc_b = Input::new(p.PIN_15, Pull::Up);
    let enc_btn = Input::new(p.PIN_16, Pull::Up);

    let machine = MACHINE.init(Mutex::new(MachineState::new()));

    // —— Spawn tasks ————————————————————————————————————————————————————————

    spawner
        .spawn(stepper_task(
            Output::new(p.PIN_2, Level::Low),
            Output::new(p.PIN_3, Level::Low),
            &RATE_SIGNALS[0],
        ))
        .unwrap();
    spawner
        .spawn(stepper_task(
            Output::new(p.PIN_4, Level::Low),
            Output::new(p.PIN_5, Level::Low),
            &RATE_SIGNALS[1],
        ))
        .unwrap();
    spawner
        .spawn(stepper_task(
            Output::new(p.PIN_6, Level::Low),
            Output::new(p.PIN_7, Level::Low),
            &RATE_SIGNALS[2],
        ))
        .unwrap();
    spawner
        .spawn(stepper_task(
            Output::new(p.PIN_8, Level::Low),
            Output::new(p.PIN_9, Level::Low),
            &RATE_SIGNALS[3],
        ))
        .unwrap();

    spawner
        .spawn(control_task(enc_a, enc_b, enc_btn, machine))
        .unwrap();
    spawner.spawn(serial_task(tx, rx, machine)).unwrap();

    info!("all tasks spawned");
}
