//! lcdbridge - Handheld LCD Bridge Firmware
//!
//! Captures a handheld console's 160×144 LCD bus and re-renders it on a
//! parallel RGB panel driven by an RP2040, with an on-screen menu, a touch
//! virtual gamepad and an emulated controller link.
//!
//! Core 1 owns capture and scan-out. Core 0 runs the link, touch and menu
//! tasks.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::{Executor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::{clk_sys_freq, ClockConfig};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::{I2C0, PIO0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use lcdbridge_core::config::LinkMode;
use lcdbridge_core::orchestrator::{CommandProcessor, PwmBacklight, SharedState};
use lcdbridge_core::traits::{Backlight, OverlaySource};
use lcdbridge_core::video::{quantize, Layout, SourcePins};
use lcdbridge_drivers::touch::Gt911;
use lcdbridge_hal_rp2040::{DpiPins, DpiScanout, DpiTiming, RpInput, RpOutput, RpPwmB};
use lcdbridge_osd::{Osd, OverlayPlane};

use crate::tasks::VideoSetup;

mod channels;
mod config;
mod tasks;

// Heap for the TOML parser
#[global_allocator]
static HEAP: Heap = Heap::empty();

const HEAP_SIZE: usize = 8 * 1024;

/// System clock; the pixel clock divider is derived from it
const SYS_CLK_HZ: u32 = 240_000_000;

const CORE1_STACK_SIZE: usize = 8 * 1024;

const HEARTBEAT_MS: u64 = 500;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

static SHARED: SharedState = SharedState::new();
static OVERLAY: StaticCell<OverlayPlane> = StaticCell::new();
static CORE1_STACK: StaticCell<Stack<CORE1_STACK_SIZE>> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("lcdbridge firmware starting...");

    init_heap();

    let p = embassy_rp::init(rp_config());
    info!("Peripherals initialized, sysclk {} Hz", clk_sys_freq());

    let config = config::load();
    let format = config.video.pixel_format;
    let scale = config.video.scale;

    // Panel enable and backlight come up first so the idle screen shows
    let _lcd_disp = Output::new(p.PIN_10, Level::High);
    let pwm = Pwm::new_output_b(p.PWM_SLICE5, p.PIN_11, PwmConfig::default());
    let mut backlight = PwmBacklight::new(RpPwmB::new(pwm));
    backlight.set_level(config.backlight.level);

    SHARED
        .palettes
        .select(config.palette.scheme, config.palette.control);

    let items = config.menu_items();
    let overlay: &'static OverlayPlane = OVERLAY.init(OverlayPlane::new(items.len() as u8));

    // Scan-out on PIO0 SM0: D0..D7 on GPIO0..7, PCLK on GPIO8
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let pins = DpiPins {
        data: [
            common.make_pio_pin(p.PIN_0),
            common.make_pio_pin(p.PIN_1),
            common.make_pio_pin(p.PIN_2),
            common.make_pio_pin(p.PIN_3),
            common.make_pio_pin(p.PIN_4),
            common.make_pio_pin(p.PIN_5),
            common.make_pio_pin(p.PIN_6),
            common.make_pio_pin(p.PIN_7),
        ],
        clock: common.make_pio_pin(p.PIN_8),
    };
    let scanout = DpiScanout::new(
        &mut common,
        sm0,
        p.DMA_CH0,
        pins,
        DpiTiming::TFT_800X480,
        scale,
        clk_sys_freq(),
    );

    let layout = Layout::new(
        config.video.output_width,
        scale as u16,
        overlay.width(),
        overlay.height(),
        config.border_style(),
    );
    debug!("Layout: {:?}", layout);

    let video = VideoSetup {
        scanout,
        source: SourcePins {
            hsync: RpInput(Input::new(p.PIN_16, Pull::None)),
            clock: RpInput(Input::new(p.PIN_17, Pull::None)),
            data0: RpInput(Input::new(p.PIN_15, Pull::None)),
            data1: RpInput(Input::new(p.PIN_14, Pull::None)),
        },
        vsync: Input::new(p.PIN_18, Pull::None),
        shared: &SHARED,
        overlay,
        layout,
        format,
        background: quantize(config.background_color().rgb(), format),
    };

    spawn_core1(
        p.CORE1,
        CORE1_STACK.init_with(Stack::new),
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| spawner.spawn(tasks::video_task(video)).unwrap())
        },
    );
    info!("Core 1 started");

    // Controller link: P14 on GPIO20, P15 on GPIO19, P10..P13 on 27, 26, 21, 22
    let dpad_select = Input::new(p.PIN_20, Pull::None);
    let buttons_select = Input::new(p.PIN_19, Pull::None);
    match config.link.mode {
        LinkMode::Emulate => {
            let lines = [
                RpOutput(Output::new(p.PIN_27, Level::High)),
                RpOutput(Output::new(p.PIN_26, Level::High)),
                RpOutput(Output::new(p.PIN_21, Level::High)),
                RpOutput(Output::new(p.PIN_22, Level::High)),
            ];
            spawner
                .spawn(tasks::link_emulate_task(
                    dpad_select,
                    buttons_select,
                    lines,
                    &SHARED,
                    overlay,
                ))
                .unwrap();
        }
        LinkMode::Sniff => {
            let lines = [
                RpInput(Input::new(p.PIN_27, Pull::Up)),
                RpInput(Input::new(p.PIN_26, Pull::Up)),
                RpInput(Input::new(p.PIN_21, Pull::Up)),
                RpInput(Input::new(p.PIN_22, Pull::Up)),
            ];
            spawner
                .spawn(tasks::link_sniff_task(
                    dpad_select,
                    buttons_select,
                    lines,
                    &SHARED,
                ))
                .unwrap();
        }
    }

    if config.touch.enabled {
        let mut i2c_config = i2c::Config::default();
        i2c_config.frequency = 400_000;
        let bus = I2c::new_async(p.I2C0, p.PIN_13, p.PIN_12, Irqs, i2c_config);
        let touch = Gt911::new(bus, config.touch.address);
        spawner
            .spawn(tasks::touch_task(
                touch,
                &SHARED,
                scale as u16,
                config.touch.poll_ms,
            ))
            .unwrap();
    }

    let processor = CommandProcessor::new(config.toggle_gesture(), items, config.backlight.level);
    let osd = Osd::new(overlay, format);
    spawner
        .spawn(tasks::command_task(
            processor,
            osd,
            backlight,
            &SHARED,
            config.command.tick_ms,
        ))
        .unwrap();

    info!("All tasks spawned");

    let mut led = Output::new(p.PIN_25, Level::Low);
    loop {
        embassy_time::Timer::after_millis(HEARTBEAT_MS).await;
        led.toggle();
        trace!("Main loop heartbeat");
    }
}

/// Overclock to [`SYS_CLK_HZ`], or stay on the default clocks if the PLL
/// cannot reach it
fn rp_config() -> embassy_rp::config::Config {
    let mut rp_config = embassy_rp::config::Config::default();
    match ClockConfig::system_freq(SYS_CLK_HZ) {
        Ok(clocks) => rp_config.clocks = clocks,
        Err(e) => warn!("No clock config for {} Hz: {:?}", SYS_CLK_HZ, Debug2Format(&e)),
    }
    rp_config
}

fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
