use std::path::PathBuf;
use std::process;
use clap::{
    Arg, ArgAction, ArgMatches, Command, crate_version, crate_authors,
    value_parser,
};
use log::LevelFilter;
use osmprint::{Config, LonLat, PhysicalSize};
use osmprint::config::{ConfigError, ConfigFile};
use osmprint::params::MAX_ZOOM;

const DEFAULT_CONFIG_PATH: &str = "/etc/osmprint.conf";


fn get_config() -> Result<Config, ConfigError> {
    let mut matches = get_matches();
    init_logging(matches.get_count("verbose"));

    let (config_path, insist) = match matches.remove_one::<PathBuf>(
        "config"
    ) {
        Some(path) => (path, true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    let mut config = Config::default();
    if let Some(file) = ConfigFile::load(&config_path, insist)? {
        log::debug!("using config file {}", config_path.display());
        config.apply_file(file);
    }
    apply_matches(&mut config, matches);
    Ok(config)
}

fn get_matches() -> ArgMatches {
    Command::new("osmprint")
        .version(crate_version!())
        .author(crate_authors!())
        .about("renders a map for printing")
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("the configuration file")
            .action(ArgAction::Set)
        )
        .arg(Arg::new("style")
            .short('s')
            .long("style")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("the style sheet of the map")
            .action(ArgAction::Set)
        )
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("the output file, format determined by extension")
            .action(ArgAction::Set)
        )
        .arg(Arg::new("center")
            .long("center")
            .value_name("LON,LAT")
            .value_parser(value_parser!(LonLat))
            .help("the center of the map in degrees")
            .allow_hyphen_values(true)
            .action(ArgAction::Set)
        )
        .arg(Arg::new("size")
            .long("size")
            .value_name("WIDTH,HEIGHT")
            .value_parser(value_parser!(PhysicalSize))
            .help("the size of the printed map in meters")
            .action(ArgAction::Set)
        )
        .arg(Arg::new("scale")
            .long("scale")
            .value_name("N")
            .value_parser(value_parser!(f64))
            .help("the scale denominator of the printed map")
            .action(ArgAction::Set)
        )
        .arg(Arg::new("zoom")
            .long("zoom")
            .value_name("LEVEL")
            .value_parser(
                value_parser!(u8).range(..=i64::from(MAX_ZOOM))
            )
            .help("the zoom level to take symbol sizes from")
            .action(ArgAction::Set)
        )
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("log more, repeat for even more")
            .action(ArgAction::Count)
        )
        .get_matches()
}

fn apply_matches(config: &mut Config, mut matches: ArgMatches) {
    if let Some(style) = matches.remove_one("style") {
        config.style = Some(style);
    }
    if let Some(output) = matches.remove_one("output") {
        config.output = output;
    }
    if let Some(center) = matches.remove_one("center") {
        config.center = center;
    }
    if let Some(size) = matches.remove_one("size") {
        config.size = size;
    }
    if let Some(scale) = matches.remove_one("scale") {
        config.scale = scale;
    }
    if let Some(zoom) = matches.remove_one("zoom") {
        config.zoom = zoom;
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let job = match get_config().and_then(Config::into_job) {
        Ok(job) => job,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    if let Err(err) = job.run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
