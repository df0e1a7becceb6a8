use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use colored::Colorize;
use planter::{
    api::{self, PlanterError},
    config::TreeSource,
};

fn tree_arg() -> Arg {
    Arg::new("tree")
        .short('t')
        .long("tree")
        .value_name("FILE")
        .help("TOML file describing the tree; tables are directories, strings are files. Defaults to the built-in tree")
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Creates the directories and files of a tree under a destination")
                .arg(
                    Arg::new("destination")
                        .help("The directory the tree will be rooted in; created if missing")
                        .required(true),
                )
                .arg(tree_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Validates a tree without writing anything")
                .arg(tree_arg()),
        )
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    init_logging(is_verbose);

    match matches.subcommand() {
        Some(("build", args)) => handle_build(args)?,
        Some(("check", args)) => handle_check(args)?,
        _ => unreachable!(),
    }

    Ok(())
}

fn init_logging(is_verbose: bool) {
    let level = if is_verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    log::debug!("executing in verbose mode");
}

fn tree_source(args: &ArgMatches) -> TreeSource {
    TreeSource::from_arg(args.get_one::<String>("tree").map(String::as_str))
}

fn handle_build(args: &ArgMatches) -> Result<(), PlanterError> {
    let destination = args
        .get_one::<String>("destination")
        .expect("destination required");

    let report = api::build(&tree_source(args), destination)?;

    for created in &report.created {
        println!("{} {}", "create".green(), created.path().display());
    }

    println!(
        "{}",
        "Folder structure and files created successfully."
            .bold()
            .green()
    );

    Ok(())
}

fn handle_check(args: &ArgMatches) -> Result<(), PlanterError> {
    let stats = api::check(&tree_source(args))?;

    println!(
        "{} {} directories, {} files",
        "valid".green(),
        stats.directories,
        stats.files
    );

    Ok(())
}
