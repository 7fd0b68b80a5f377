//! Command line arguments and the settings resolved from them

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use sora_core::source::DEFAULT_BASE_URL;
use sora_core::{
    ApiConfig, Coordinate, Credential, DemoMode, DeviceLocator, EffectTier, IpGeolocator,
    Language,
};

/// Terminal weather with rain, cloud and sunshine effects
#[derive(Parser, Debug)]
#[command(name = "sora", version)]
#[command(about = "Terminal weather with rain, cloud and sunshine effects")]
pub struct Args {
    /// OpenWeatherMap API key. Without one, demo weather is shown
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Label and API language (ja, en)
    #[arg(long, default_value = "ja", value_parser = parse_language)]
    pub lang: Language,

    /// Weather endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Demo weather when no key is configured
    #[arg(long, value_enum, default_value_t = DemoArg::Seeded)]
    pub demo: DemoArg,

    /// Latitude to use instead of looking up the device location
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude to use instead of looking up the device location
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Skip location lookup and use the default location (Tokyo)
    #[arg(long, conflicts_with = "lat")]
    pub no_geolocate: bool,

    /// Auto-refresh interval in seconds (0 disables)
    #[arg(long, short, default_value = "600")]
    pub refresh_interval: u64,

    /// Animation frames per second
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..=120))]
    pub fps: u32,

    /// Seed for particle placement (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Show an effect without fetching, e.g. rain:heavy or cloud:dense:fast
    #[arg(long, value_parser = parse_preview)]
    pub preview: Option<EffectTier>,

    /// Test the API key with one request and exit
    #[arg(long)]
    pub check_key: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemoArg {
    /// Always rainy Tokyo
    Fixed,
    /// Derived from the coordinate
    Seeded,
}

impl From<DemoArg> for DemoMode {
    fn from(arg: DemoArg) -> Self {
        match arg {
            DemoArg::Fixed => DemoMode::Fixed,
            DemoArg::Seeded => DemoMode::Seeded,
        }
    }
}

fn parse_language(value: &str) -> Result<Language, String> {
    Language::from_code(value).ok_or_else(|| format!("unsupported language '{}'", value))
}

fn parse_preview(value: &str) -> Result<EffectTier, String> {
    EffectTier::parse(value)
        .ok_or_else(|| format!("unknown effect '{}' (expected rain, cloud or sunshine)", value))
}

/// Everything the app needs, resolved from [`Args`]
#[derive(Clone, Debug)]
pub struct Settings {
    pub credential: Credential,
    pub api: ApiConfig,
    pub demo_mode: DemoMode,
    pub locator: DeviceLocator,
    /// `None` when auto-refresh is off
    pub refresh_interval: Option<Duration>,
    pub frame_interval: Duration,
    pub seed: u64,
    pub log_file: Option<PathBuf>,
    pub preview: Option<EffectTier>,
    pub check_key: bool,
}

impl Settings {
    pub fn from_args(args: Args) -> Self {
        // Run-time key first, then one baked in at build time
        let credential = Credential::resolve(args.api_key, option_env!("OPENWEATHER_API_KEY"));

        let locator = match (args.lat, args.lon) {
            (Some(lat), Some(lon)) => DeviceLocator::Fixed(Coordinate::new(lat, lon)),
            _ if args.no_geolocate => DeviceLocator::Disabled,
            _ => DeviceLocator::Ip(IpGeolocator::default()),
        };

        let seed = args.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });

        Self {
            credential,
            api: ApiConfig {
                base_url: args.base_url,
                language: args.lang,
                ..ApiConfig::default()
            },
            demo_mode: args.demo.into(),
            locator,
            refresh_interval: (args.refresh_interval > 0)
                .then(|| Duration::from_secs(args.refresh_interval)),
            frame_interval: Duration::from_secs(1) / args.fps.max(1),
            seed,
            log_file: args.log_file,
            preview: args.preview,
            check_key: args.check_key,
        }
    }
}
