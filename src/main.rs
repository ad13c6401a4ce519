//! netstate CLI - Command-line interface
//!
//! Commands:
//!   diff     - Compare two snapshot files
//!   inspect  - Summarize one snapshot file
//!   specs    - Show the effective diff rules
//!   schema   - Print JSON schema for output types

use netstate::*;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "diff" => cmd_diff(&args[2..]),
        "inspect" => cmd_inspect(&args[2..]),
        "specs" => cmd_specs(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("netstate {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"
netstate - network device state capture and diff

USAGE:
    netstate <COMMAND> [OPTIONS]

COMMANDS:
    diff <first.json> <second.json>  Compare two snapshot files
    inspect <snapshot.json>          Summarize a snapshot file
    specs                            Show the effective diff rules
    schema [name]                    Print JSON schema for output type
    version                          Print version

OPTIONS:
    --specs <rules.yaml>             Diff rules file (default: builtin)
    --json                           JSON output format (diff, inspect)
    --output <file>                  Output file (default: stdout)

EXAMPLES:
    netstate diff core3_monday.json core3_friday.json
    netstate diff a.json b.json --specs rules.yaml --json
    netstate inspect core3_monday.json
    netstate specs --specs rules.yaml
"#
    );
}

fn cmd_diff(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        return Err("Usage: netstate diff <first.json> <second.json> [--specs rules.yaml]".into());
    }

    let first_path = &args[0];
    let second_path = &args[1];
    let json_output = args.contains(&"--json".to_string());
    let output = parse_output_arg(args);

    let first = Snapshot::from_path(&PathBuf::from(first_path))?;
    let second = Snapshot::from_path(&PathBuf::from(second_path))?;
    let registry = load_registry(args)?;

    let report = compare_snapshots(&first, &second, &registry);

    let rendered = if json_output {
        serde_json::to_string_pretty(&report)?
    } else {
        report.to_report()
    };
    write_output(&output, &rendered)?;

    if report.is_clean() {
        Ok(())
    } else {
        Err(format!("{} difference(s) found", report.total_differences()).into())
    }
}

fn cmd_inspect(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: netstate inspect <snapshot.json>".into());
    }

    let path = &args[0];
    let json_output = args.contains(&"--json".to_string());

    let snapshot = Snapshot::from_path(&PathBuf::from(path))?;
    let summary = snapshot.summary();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{} ({} commands)", snapshot.source_hash(), snapshot.len());
        for entry in &summary {
            match (entry.rows, entry.columns) {
                (Some(rows), Some(columns)) => println!(
                    "  {:<40} {} rows x {} columns",
                    entry.command, rows, columns
                ),
                _ => println!(
                    "  {:<40} raw ({} bytes)",
                    entry.command,
                    entry.raw_bytes.unwrap_or(0)
                ),
            }
        }
    }

    Ok(())
}

fn cmd_specs(args: &[String]) -> Result<()> {
    let registry = load_registry(args)?;
    print!("{}", registry.to_yaml()?);
    Ok(())
}

fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: compare, diff, spec, registry, summary");
            Ok(())
        }
        "compare" => print_schema::<CompareReport>(),
        "diff" => print_schema::<DiffReport>(),
        "spec" => print_schema::<DiffSpec>(),
        "registry" => print_schema::<SpecRegistry>(),
        "summary" => print_schema::<Vec<CommandSummary>>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// The `--specs` registry when given, builtin rules otherwise.
fn load_registry(args: &[String]) -> Result<SpecRegistry> {
    for (i, arg) in args.iter().enumerate() {
        if arg == "--specs" {
            match args.get(i + 1) {
                Some(path) => return SpecRegistry::from_path(&PathBuf::from(path)),
                None => return Err("--specs requires a file path".into()),
            }
        }
    }
    Ok(SpecRegistry::builtin())
}

fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    for (i, arg) in args.iter().enumerate() {
        if arg == "--output" || arg == "-o" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}

fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            eprintln!("Written to: {}", p.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
