//! # LabCalc CLI Application
//!
//! Terminal interface for the lab_core calculators.
//!
//! ```text
//! lab_cli mw <formula> [--strict]
//! lab_cli molarity <formula> <mol/L> <L>
//! lab_cli dilute <C1> <C2> <V2>
//! lab_cli media <LB|LBGM|MSGG_2x> [volume] [--batches N] [--agar]
//! lab_cli formulas [prefix]
//! lab_cli stats <value> <value>...
//! ```
//!
//! Global options: `--settings <path>`, `--export <path>`, `--verbose`.
//! With no command an interactive demo runs instead.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{debug, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use lab_core::chemistry::{suggest_formulas, MolarityInput};
use lab_core::export::{render, Report};
use lab_core::media::ScaledRecipe;
use lab_core::stats::summarize;
use lab_core::{
    dilution_volume, evaluate_formula_with, load_settings, mass_for_molarity, scale_recipe,
    write_export, CalculationHistory, CalculationRecord, ExportFormat, LabError, LabResult,
    LabSettings, MolecularWeightResult, ParseMode,
};

const USAGE: &str = "\
Usage:
  lab_cli mw <formula> [--strict]
  lab_cli molarity <formula> <mol/L> <L>
  lab_cli dilute <C1> <C2> <V2>
  lab_cli media <LB|LBGM|MSGG_2x> [volume] [--batches N] [--agar]
  lab_cli formulas [prefix]
  lab_cli stats <value> <value>...

Options:
  --settings <path>  Load settings from a JSON file
  --export <path>    Write the result to a file (.txt, .csv or .json)
  --verbose          Debug logging";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    MolecularWeight { formula: String, strict: bool },
    Molarity { formula: String, molarity: f64, volume_l: f64 },
    Dilute { c1: f64, c2: f64, v2: f64 },
    Media { id: String, volume_l: Option<f64>, batches: Option<u32>, agar: bool },
    Formulas { prefix: String },
    Stats { values: Vec<f64> },
    Interactive,
}

#[derive(Debug, Clone, PartialEq)]
struct CliArgs {
    settings: Option<PathBuf>,
    export: Option<PathBuf>,
    verbose: bool,
    command: Command,
}

fn parse_args(args: &[String]) -> LabResult<CliArgs> {
    let mut settings = None;
    let mut export = None;
    let mut verbose = false;
    let mut strict = false;
    let mut agar = false;
    let mut batches = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--settings" => settings = Some(PathBuf::from(option_value(&mut iter, "--settings")?)),
            "--export" => export = Some(PathBuf::from(option_value(&mut iter, "--export")?)),
            "--batches" => {
                let value = option_value(&mut iter, "--batches")?;
                batches = Some(value.parse::<u32>().map_err(|_| {
                    LabError::invalid_input("batches", value, "Batch count must be a whole number")
                })?);
            }
            "--verbose" | "-v" => verbose = true,
            "--strict" => strict = true,
            "--agar" => agar = true,
            other if other.starts_with("--") => {
                return Err(LabError::invalid_input("option", other, "Unknown option"));
            }
            other => positional.push(other),
        }
    }

    let command = match positional.as_slice() {
        [] => Command::Interactive,
        ["mw", formula] => Command::MolecularWeight { formula: formula.to_string(), strict },
        ["molarity", formula, molarity, volume] => Command::Molarity {
            formula: formula.to_string(),
            molarity: parse_number("molarity", molarity)?,
            volume_l: parse_number("volume_l", volume)?,
        },
        ["dilute", c1, c2, v2] => Command::Dilute {
            c1: parse_number("stock_concentration", c1)?,
            c2: parse_number("final_concentration", c2)?,
            v2: parse_number("final_volume", v2)?,
        },
        ["media", id] => Command::Media { id: id.to_string(), volume_l: None, batches, agar },
        ["media", id, volume] => Command::Media {
            id: id.to_string(),
            volume_l: Some(parse_number("volume_l", volume)?),
            batches,
            agar,
        },
        ["formulas"] => Command::Formulas { prefix: String::new() },
        ["formulas", prefix] => Command::Formulas { prefix: prefix.to_string() },
        ["stats", values @ ..] if !values.is_empty() => Command::Stats {
            values: values
                .iter()
                .map(|v| parse_number("values", v))
                .collect::<LabResult<_>>()?,
        },
        [name, ..] => {
            return Err(LabError::invalid_input(
                "command",
                name.to_string(),
                "Unknown command or wrong number of arguments",
            ));
        }
    };

    Ok(CliArgs { settings, export, verbose, command })
}

fn option_value<'a>(iter: &mut impl Iterator<Item = &'a String>, name: &str) -> LabResult<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| LabError::invalid_input(name, "", "Option requires a value"))
}

fn parse_number(field: &str, value: &str) -> LabResult<f64> {
    value
        .parse()
        .map_err(|_| LabError::invalid_input(field, value, "Expected a number"))
}

/// Format for `--export`: by file extension, else the settings default
fn export_format_for(path: &Path, fallback: ExportFormat) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("csv") => ExportFormat::Csv,
        Some("json") => ExportFormat::Json,
        Some("txt") => ExportFormat::Text,
        _ => fallback,
    }
}

struct Session {
    settings: LabSettings,
    export: Option<PathBuf>,
    history: CalculationHistory,
}

impl Session {
    fn export<R: Report>(&self, report: &R) -> LabResult<()> {
        if let Some(path) = &self.export {
            let format = export_format_for(path, self.settings.export_format);
            write_export(&render(report, format)?, path)?;
            println!("Exported to {}", path.display());
        }
        Ok(())
    }

    fn parse_mode(&self, strict: bool) -> ParseMode {
        if strict { ParseMode::Strict } else { self.settings.parse_mode }
    }

    fn molecular_weight(&mut self, formula: &str, strict: bool) -> LabResult<()> {
        let result = evaluate_formula_with(formula, self.parse_mode(strict))?;
        print_molecular_weight(&result);
        self.export(&result)?;
        self.history.record(CalculationRecord::MolecularWeight(result));
        Ok(())
    }

    fn molarity(&mut self, formula: &str, molarity: f64, volume_l: f64) -> LabResult<()> {
        let result = mass_for_molarity(&MolarityInput::new(formula, molarity, volume_l))?;
        print!("{}", result.text());
        self.export(&result)?;
        self.history.record(CalculationRecord::Molarity(result));
        Ok(())
    }

    fn dilute(&mut self, c1: f64, c2: f64, v2: f64) -> LabResult<()> {
        let result = dilution_volume(c1, c2, v2)?;
        println!("Stock:   {:.4}", result.stock_volume);
        println!("Diluent: {:.4}", result.diluent_volume);
        println!("Final:   {} at {}", result.final_volume, result.final_concentration);
        self.export(&result)?;
        self.history.record(CalculationRecord::Dilution(result));
        Ok(())
    }

    fn media(&mut self, id: &str, volume_l: Option<f64>, batches: Option<u32>, agar: bool) -> LabResult<()> {
        let volume_l = volume_l.unwrap_or(self.settings.default_volume_l);
        let batches = batches.unwrap_or(self.settings.default_batch_count);
        let recipe = scale_recipe(id, volume_l, batches, agar)?;
        print_recipe(&recipe);
        self.export(&recipe)?;
        self.history.record(CalculationRecord::Media(recipe));
        Ok(())
    }

    fn stats(&mut self, values: &[f64]) -> LabResult<()> {
        let summary = summarize(values)?;
        print!("{}", summary.text());
        self.export(&summary)?;
        self.history.record(CalculationRecord::Statistics(summary));
        Ok(())
    }

    fn run(&mut self, command: Command) -> LabResult<()> {
        match command {
            Command::MolecularWeight { formula, strict } => self.molecular_weight(&formula, strict),
            Command::Molarity { formula, molarity, volume_l } => self.molarity(&formula, molarity, volume_l),
            Command::Dilute { c1, c2, v2 } => self.dilute(c1, c2, v2),
            Command::Media { id, volume_l, batches, agar } => self.media(&id, volume_l, batches, agar),
            Command::Formulas { prefix } => {
                print_formulas(&prefix);
                Ok(())
            }
            Command::Stats { values } => self.stats(&values),
            Command::Interactive => self.interactive(),
        }
    }

    fn interactive(&mut self) -> LabResult<()> {
        println!("LabCalc CLI - Laboratory Calculator");
        println!("===================================");
        println!();
        print_formulas("");
        println!();

        let formula = prompt_string("Enter formula [NaCl]: ", "NaCl");
        report_error(self.molecular_weight(&formula, false));
        println!();

        let molarity = prompt_f64("Enter molarity (mol/L) [0.1]: ", 0.1);
        let volume_l = prompt_f64("Enter volume (L) [0.5]: ", 0.5);
        report_error(self.molarity(&formula, molarity, volume_l));
        println!();

        let media = prompt_string("Enter medium (LB, LBGM, MSGG_2x) [LB]: ", "LB");
        let media_volume = prompt_f64(
            &format!("Enter batch volume (L) [{}]: ", self.settings.default_volume_l),
            self.settings.default_volume_l,
        );
        let agar = prompt_string("Agar plates? (y/n) [n]: ", "n").eq_ignore_ascii_case("y");
        println!();
        report_error(self.media(&media, Some(media_volume), None, agar));

        if !self.history.is_empty() {
            println!();
            println!("═══════════════════════════════════════");
            println!("  SESSION HISTORY");
            println!("═══════════════════════════════════════");
            print!("{}", self.history.text());
        }
        Ok(())
    }
}

fn prompt_string(prompt: &str, default: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default.to_string();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default.to_string();
    }

    match input.trim() {
        "" => default.to_string(),
        value => value.to_string(),
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_string(prompt, &default.to_string()).parse().unwrap_or(default)
}

fn print_molecular_weight(result: &MolecularWeightResult) {
    println!("═══════════════════════════════════════");
    println!("  {}  {:.3} g/mol", result.formula, result.molecular_weight);
    println!("═══════════════════════════════════════");
    for row in &result.breakdown {
        println!(
            "  {:<3} x{:<4} {:>10.4}  = {:>10.4}",
            row.symbol, row.count, row.atomic_weight, row.contribution
        );
    }
}

fn print_recipe(recipe: &ScaledRecipe) {
    println!("═══════════════════════════════════════");
    println!("  {}", recipe.title);
    println!("═══════════════════════════════════════");
    if recipe.batch_count > 1 {
        println!("  {} batches x {} L", recipe.batch_count, recipe.target_volume_l);
    }
    println!();

    let (left, right) = recipe.columns();
    let left_width = left
        .iter()
        .map(|c| c.name.chars().count() + c.display_amount().chars().count() + 2)
        .max()
        .unwrap_or(0);
    for (i, component) in left.iter().enumerate() {
        let cell = format!("{}: {}", component.name, component.display_amount());
        match right.get(i) {
            Some(other) => println!(
                "  {:<width$}    {}: {}",
                cell,
                other.name,
                other.display_amount(),
                width = left_width
            ),
            None => println!("  {}", cell),
        }
    }

    println!();
    print!("{}", recipe.protocol.to_text());
}

fn print_formulas(prefix: &str) {
    println!("Common formulas:");
    for entry in suggest_formulas(prefix) {
        println!("  {:<9} {:<10} {:>8.2} g/mol  {}", entry.formula, entry.display, entry.listed_mw, entry.common_use);
    }
}

fn report_error(result: LabResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            false
        }
    }
}

fn init_logging(settings: &LabSettings, verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::from(settings.log_level) };
    // A logger may already be installed; keep going without one
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            report_error(Err(e));
            eprintln!();
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let settings = match &cli.settings {
        Some(path) if path.exists() => match load_settings(path) {
            Ok(settings) => settings,
            Err(e) => {
                report_error(Err(e));
                return ExitCode::FAILURE;
            }
        },
        _ => LabSettings::default(),
    };
    init_logging(&settings, cli.verbose);
    if let Some(path) = cli.settings.as_ref().filter(|p| !p.exists()) {
        warn!("settings file {} not found, using defaults", path.display());
    }
    debug!("running {:?}", cli.command);

    let mut session = Session {
        settings,
        export: cli.export,
        history: CalculationHistory::new(),
    };
    if report_error(session.run(cli.command)) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
