//! CLI application for controlling Yeelight bulbs.
//!
//! Run with: cargo run --example yeelight_cli -- --help

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::time::Duration;
use yeelight_rs::{
    AdjustAction, AdjustProperty, Brightness, Bulb, Color, HueSaturation, Kelvin, Param, Property,
    Transition, Transport, TransportConfig,
};

#[derive(Parser)]
#[command(name = "yeelight-cli")]
#[command(about = "Control Yeelight bulbs from the command line", long_about = None)]
struct Cli {
    /// IP address of the bulb
    #[arg(short, long, global = true)]
    ip: Option<IpAddr>,

    /// Control port of the bulb
    #[arg(short, long, global = true, default_value_t = Transport::DEFAULT_PORT)]
    port: u16,

    /// Connect and read timeout in milliseconds (0 waits forever)
    #[arg(short, long, global = true, default_value = "5000")]
    timeout: u64,

    /// Fade over this many milliseconds instead of changing suddenly
    #[arg(short, long, global = true)]
    smooth: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print all cached properties after a refresh
    Status,

    /// Turn the bulb on
    On,

    /// Turn the bulb off
    Off,

    /// Toggle the bulb on/off
    Toggle,

    /// Set RGB color as "r,g,b" (0-255 for each component)
    Color { rgb: Color },

    /// Set hue (0-359) and saturation (0-100)
    Hsv {
        #[arg(value_parser = clap::value_parser!(u16).range(0..360))]
        hue: u16,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        saturation: u8,
    },

    /// Set brightness (1-100)
    Brightness {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=100))]
        level: u8,
    },

    /// Set color temperature in Kelvin (1700-6500)
    Temperature {
        #[arg(value_parser = clap::value_parser!(u16).range(1700..=6500))]
        kelvin: u16,
    },

    /// Step a property up or down
    Adjust {
        #[arg(value_enum)]
        action: ActionArg,
        #[arg(value_enum)]
        property: PropertyArg,
    },

    /// Save the current state as the power-on default
    Save,

    /// Send a raw method; numeric params are sent as integers
    Raw { method: String, params: Vec<String> },
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Increase,
    Decrease,
    Circle,
}

#[derive(Clone, Copy, ValueEnum)]
enum PropertyArg {
    Bright,
    Ct,
    Color,
}

impl From<ActionArg> for AdjustAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Increase => AdjustAction::Increase,
            ActionArg::Decrease => AdjustAction::Decrease,
            ActionArg::Circle => AdjustAction::Circle,
        }
    }
}

impl From<PropertyArg> for AdjustProperty {
    fn from(arg: PropertyArg) -> Self {
        match arg {
            PropertyArg::Bright => AdjustProperty::Brightness,
            PropertyArg::Ct => AdjustProperty::ColorTemperature,
            PropertyArg::Color => AdjustProperty::Color,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let ip = cli.ip.ok_or("IP address is required. Use --ip <IP>")?;
    let timeout = (cli.timeout > 0).then(|| Duration::from_millis(cli.timeout));
    let transport = Transport::new(&ip.to_string(), cli.port).with_config(
        TransportConfig::new()
            .with_connect_timeout(timeout)
            .with_io_timeout(timeout),
    );
    let transition = match cli.smooth {
        Some(ms) => Transition::smooth(ms).ok_or("Smooth duration must be at least 30 ms")?,
        None => Transition::sudden(),
    };

    let mut bulb = Bulb::with_transport(transport);

    // Raw commands skip the property fetch the other commands need
    if let Commands::Raw { method, params } = &cli.command {
        let params = params
            .iter()
            .map(|p| match p.parse::<i64>() {
                Ok(n) => Param::Int(n),
                Err(_) => Param::Str(p.clone()),
            })
            .collect();
        let result = bulb.invoke(method, params).await?;
        println!("{}", serde_json::to_string(&result)?);
        return Ok(());
    }

    bulb.refresh().await?;

    match cli.command {
        Commands::Raw { .. } => unreachable!(),

        Commands::Status => {
            println!("Bulb at {}:", bulb.transport().addr());
            for property in [
                Property::Power,
                Property::Brightness,
                Property::ColorMode,
                Property::ColorTemperature,
                Property::RgbColor,
                Property::Hue,
                Property::Saturation,
                Property::Flow,
                Property::SleepRemaining,
                Property::MusicOn,
                Property::Name,
            ] {
                println!("  {:12} {}", property.as_ref(), bulb.property(property));
            }
        }

        Commands::On => {
            bulb.turn_on(transition).await?;
            println!("Bulb turned ON");
        }

        Commands::Off => {
            bulb.turn_off(transition).await?;
            println!("Bulb turned OFF");
        }

        Commands::Toggle => {
            bulb.toggle().await?;
            println!("Bulb toggled");
        }

        Commands::Color { rgb } => {
            bulb.set_rgb_color(rgb, transition).await?;
            println!(
                "Color set to RGB({}, {}, {})",
                rgb.red(),
                rgb.green(),
                rgb.blue()
            );
        }

        Commands::Hsv { hue, saturation } => {
            let hs = HueSaturation::create(hue, saturation).ok_or("Invalid hue/saturation")?;
            bulb.set_hsv_color(hs, transition).await?;
            println!("Color set to hue {} saturation {}", hue, saturation);
        }

        Commands::Brightness { level } => {
            let brightness = Brightness::create(level).ok_or("Brightness must be 1-100")?;
            bulb.set_brightness(brightness, transition).await?;
            println!("Brightness set to {}%", level);
        }

        Commands::Temperature { kelvin } => {
            let temp = Kelvin::create(kelvin).ok_or("Temperature must be 1700-6500K")?;
            bulb.set_color_temperature(temp, transition).await?;
            println!("Temperature set to {}K", kelvin);
        }

        Commands::Adjust { action, property } => {
            bulb.adjust(action.into(), property.into()).await?;
            println!("Adjusted, brightness now {}", bulb.property(Property::Brightness));
        }

        Commands::Save => {
            bulb.save_state().await?;
            println!("State saved as default");
        }
    }

    Ok(())
}
