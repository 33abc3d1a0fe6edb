//! Inference shell: load the persisted pipeline and serve predictions.
//!
//! With all eleven feature flags given, runs one prediction and exits.
//! Otherwise starts an interactive form: one prompt per clinical field,
//! with defaults, plus `:healthy` / `:risk` shortcuts that score the
//! built-in example records. If the artifact cannot be located or decoded,
//! prints diagnostics and exits without predicting.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;

use cardiorisk::data::{
    ChestPainType, ExerciseAngina, FastingBs, PatientRecord, RestingEcg, Sex, StSlope,
};
use cardiorisk::{persist, ModelCache, Prediction, RiskLabel, RiskPipeline};

/// Predict cardiac disease risk for one clinical record.
#[derive(Parser, Debug)]
#[command(name = "predict", version)]
struct Args {
    /// Model artifact path (tried before the standard locations)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Age in years
    #[arg(long)]
    age: Option<f32>,

    /// Sex: M or F
    #[arg(long)]
    sex: Option<String>,

    /// Chest pain type: ASY, ATA, NAP or TA
    #[arg(long)]
    chest_pain: Option<String>,

    /// Resting blood pressure in mmHg
    #[arg(long)]
    resting_bp: Option<f32>,

    /// Serum cholesterol in mg/dL
    #[arg(long)]
    cholesterol: Option<f32>,

    /// Fasting blood sugar above 120 mg/dL: 0 or 1
    #[arg(long)]
    fasting_bs: Option<String>,

    /// Resting ECG result: Normal, ST or LVH
    #[arg(long)]
    resting_ecg: Option<String>,

    /// Maximum heart rate achieved, in bpm
    #[arg(long)]
    max_hr: Option<f32>,

    /// Exercise-induced angina: Y or N
    #[arg(long)]
    exercise_angina: Option<String>,

    /// ST depression induced by exercise
    #[arg(long)]
    oldpeak: Option<f32>,

    /// Slope of the peak-exercise ST segment: Up, Flat or Down
    #[arg(long)]
    st_slope: Option<String>,
}

static MODEL: ModelCache = ModelCache::new();

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cardiorisk=warn".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let mut candidates = Vec::new();
    if let Some(model) = &args.model {
        candidates.push(model.clone());
    }
    candidates.extend(persist::default_candidates());

    // Fail closed: without a loadable artifact there is nothing to predict.
    let pipeline = match MODEL.get_or_load(&candidates) {
        Ok(pipeline) => pipeline,
        Err(error) => {
            report_load_failure(&candidates, &error);
            std::process::exit(1);
        }
    };

    match record_from_args(&args)? {
        Some(record) => {
            render(&pipeline.predict(&record));
            Ok(())
        }
        None => interactive_loop(&pipeline),
    }
}

fn report_load_failure(candidates: &[PathBuf], error: &persist::LoadError) {
    eprintln!("error: could not load a model artifact: {error}");
    eprintln!();
    eprintln!("paths checked:");
    for path in candidates {
        let status = if path.exists() { "exists but unusable" } else { "missing" };
        eprintln!("  {} ({status})", path.display());
    }
    eprintln!();
    eprintln!(
        "supported artifact format: v{}.{}",
        persist::FORMAT_VERSION_MAJOR,
        persist::FORMAT_VERSION_MINOR
    );
    eprintln!("cardiorisk version: {}", env!("CARGO_PKG_VERSION"));
    eprintln!();
    eprintln!("run the `train` binary to produce Model/model.crsk");
}

/// Build a record from CLI flags. `Ok(None)` means no feature flags were
/// given and the shell should go interactive; a partial set is an error.
fn record_from_args(args: &Args) -> Result<Option<PatientRecord>> {
    let given = [
        args.age.is_some(),
        args.sex.is_some(),
        args.chest_pain.is_some(),
        args.resting_bp.is_some(),
        args.cholesterol.is_some(),
        args.fasting_bs.is_some(),
        args.resting_ecg.is_some(),
        args.max_hr.is_some(),
        args.exercise_angina.is_some(),
        args.oldpeak.is_some(),
        args.st_slope.is_some(),
    ];
    let count = given.iter().filter(|&&g| g).count();
    if count == 0 {
        return Ok(None);
    }
    if count < given.len() {
        return Err(anyhow!(
            "one-shot mode needs all 11 feature flags ({count} given); \
             run without feature flags for the interactive form"
        ));
    }

    fn parse<T: FromStr>(value: &Option<String>) -> Result<T>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        Ok(value.as_deref().expect("presence checked above").parse()?)
    }

    Ok(Some(PatientRecord {
        age: args.age.expect("presence checked above"),
        sex: parse(&args.sex)?,
        chest_pain_type: parse(&args.chest_pain)?,
        resting_bp: args.resting_bp.expect("presence checked above"),
        cholesterol: args.cholesterol.expect("presence checked above"),
        fasting_bs: parse(&args.fasting_bs)?,
        resting_ecg: parse(&args.resting_ecg)?,
        max_hr: args.max_hr.expect("presence checked above"),
        exercise_angina: parse(&args.exercise_angina)?,
        oldpeak: args.oldpeak.expect("presence checked above"),
        st_slope: parse(&args.st_slope)?,
    }))
}

// =============================================================================
// Interactive form
// =============================================================================

fn interactive_loop(pipeline: &Arc<RiskPipeline>) -> Result<()> {
    println!("cardiac risk predictor ({} trees)", pipeline.forest().n_trees());
    println!("enter patient data; press Enter to accept the [default]");
    println!("commands: :healthy / :risk score an example record, q quits");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        match read_record(&mut lines)? {
            Some(record) => render(&pipeline.predict(&record)),
            None => break,
        }
    }

    Ok(())
}

/// Read one record from the form. `Ok(None)` means quit/EOF.
fn read_record(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<PatientRecord>> {
    macro_rules! field {
        ($value:expr) => {
            match $value? {
                Answer::Value(v) => v,
                Answer::Example(record) => return Ok(Some(record)),
                Answer::Quit => return Ok(None),
            }
        };
    }

    Ok(Some(PatientRecord {
        age: field!(prompt_number(lines, "Age (years)", 50.0)),
        sex: field!(prompt_choice(lines, "Sex", Sex::SPELLINGS, Sex::M)),
        chest_pain_type: field!(prompt_choice(
            lines,
            "Chest pain type",
            ChestPainType::SPELLINGS,
            ChestPainType::Asy
        )),
        resting_bp: field!(prompt_number(lines, "Resting blood pressure (mmHg)", 120.0)),
        cholesterol: field!(prompt_number(lines, "Cholesterol (mg/dL)", 200.0)),
        fasting_bs: field!(prompt_choice(
            lines,
            "Fasting blood sugar > 120 mg/dL",
            FastingBs::SPELLINGS,
            FastingBs::No
        )),
        resting_ecg: field!(prompt_choice(
            lines,
            "Resting ECG",
            RestingEcg::SPELLINGS,
            RestingEcg::Normal
        )),
        max_hr: field!(prompt_number(lines, "Max heart rate (bpm)", 150.0)),
        exercise_angina: field!(prompt_choice(
            lines,
            "Exercise-induced angina",
            ExerciseAngina::SPELLINGS,
            ExerciseAngina::N
        )),
        oldpeak: field!(prompt_number(lines, "ST depression (Oldpeak)", 1.0)),
        st_slope: field!(prompt_choice(lines, "ST slope", StSlope::SPELLINGS, StSlope::Flat)),
    }))
}

/// Outcome of one prompt.
enum Answer<T> {
    Value(T),
    /// A `:healthy` / `:risk` shortcut replaces the whole form.
    Example(PatientRecord),
    Quit,
}

fn next_input(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<String>> {
    match lines.next() {
        None => Ok(None),
        Some(line) => {
            let line = line?;
            let trimmed = line.trim();
            match trimmed {
                "q" | "quit" => Ok(None),
                _ => Ok(Some(trimmed.to_string())),
            }
        }
    }
}

fn shortcut(input: &str) -> Option<PatientRecord> {
    match input {
        ":healthy" => Some(PatientRecord::example_healthy()),
        ":risk" => Some(PatientRecord::example_at_risk()),
        _ => None,
    }
}

fn prompt_number(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
    default: f32,
) -> Result<Answer<f32>> {
    loop {
        print!("{label} [{default}]: ");
        io::stdout().flush()?;

        let Some(input) = next_input(lines)? else { return Ok(Answer::Quit) };
        if input.is_empty() {
            return Ok(Answer::Value(default));
        }
        if let Some(record) = shortcut(&input) {
            return Ok(Answer::Example(record));
        }
        match input.parse::<f32>() {
            Ok(value) if value.is_finite() => return Ok(Answer::Value(value)),
            _ => println!("  please enter a number"),
        }
    }
}

fn prompt_choice<T>(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
    choices: &[&str],
    default: T,
) -> Result<Answer<T>>
where
    T: FromStr + std::fmt::Display + Copy,
{
    loop {
        print!("{label} ({}) [{default}]: ", choices.join("/"));
        io::stdout().flush()?;

        let Some(input) = next_input(lines)? else { return Ok(Answer::Quit) };
        if input.is_empty() {
            return Ok(Answer::Value(default));
        }
        if let Some(record) = shortcut(&input) {
            return Ok(Answer::Example(record));
        }
        match input.parse::<T>() {
            Ok(value) => return Ok(Answer::Value(value)),
            Err(_) => println!("  unrecognized value `{input}`"),
        }
    }
}

// =============================================================================
// Result rendering
// =============================================================================

fn render(prediction: &Prediction) {
    let [p_health, p_risk] = prediction.probabilities;

    println!();
    match prediction.label {
        RiskLabel::Healthy => println!("prediction: HEALTHY (0)"),
        RiskLabel::AtRisk => println!("prediction: AT RISK (1)"),
    }
    println!("  probability of health: {:5.1}%", p_health * 100.0);
    println!("  probability of risk:   {:5.1}%", p_risk * 100.0);
    println!("  model confidence:      {:5.1}%", prediction.confidence() * 100.0);

    let guidance = if p_risk < 0.3 {
        "low risk - keep up healthy habits and regular check-ups"
    } else if p_risk < 0.7 {
        "moderate risk - a medical evaluation is recommended"
    } else {
        "high risk - seek specialized cardiac evaluation"
    };
    println!("  {guidance}");
    println!("  (educational tool, not a medical diagnosis)");
}
