use clap::Args;
use hiring_engine::config::AppConfig;
use hiring_engine::error::AppError;
use hiring_engine::workflows::hiring::screening::{
    decide_admission, AdmissionDecision, DocumentTextExtractor, ResumeAnalyzer, ResumeDocument,
    ResumeEvaluation, ScreeningConfig, TextExtractor,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Resume to score (PDF or plain text)
    #[arg(long)]
    pub(crate) resume: PathBuf,
    /// Required skill; repeat the flag for each skill
    #[arg(long = "skill", required = true)]
    pub(crate) skills: Vec<String>,
    /// Required experience, in months
    #[arg(long, default_value_t = 0)]
    pub(crate) experience_months: u32,
    /// Admission threshold in percent (defaults to SCREENING_MIN_SKILL_MATCH)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) min_skill_match: Option<u8>,
    /// Print the evaluation as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationReport {
    pub(crate) resume: String,
    pub(crate) evaluation: ResumeEvaluation,
    pub(crate) decision: AdmissionDecision,
}

pub(crate) fn run_evaluation(args: EvaluateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?.screening;
    if let Some(threshold) = args.min_skill_match {
        config.minimum_skill_match = threshold;
    }

    let report = evaluate_resume(
        &args.resume,
        &args.skills,
        args.experience_months,
        &config,
    )?;

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Evaluation payload unavailable: {err}"),
        }
    } else {
        render_report(&report, &args.skills);
    }
    Ok(())
}

pub(crate) fn evaluate_resume(
    path: &Path,
    skills: &[String],
    experience_months: u32,
    config: &ScreeningConfig,
) -> Result<EvaluationReport, AppError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resume")
        .to_string();
    let content_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());
    let document = ResumeDocument::new(file_name.clone(), content_type, bytes);

    let text = DocumentTextExtractor::new(config.max_resume_bytes).extract(&document)?;
    let evaluation = ResumeAnalyzer::new().evaluate(&text, skills, experience_months);
    let decision = decide_admission(&evaluation, config);

    Ok(EvaluationReport {
        resume: file_name,
        evaluation,
        decision,
    })
}

fn render_report(report: &EvaluationReport, skills: &[String]) {
    let evaluation = &report.evaluation;
    println!("Resume evaluation: {}", report.resume);
    println!(
        "  Skill match: {}% ({} of {} required)",
        evaluation.skill_match_percent,
        evaluation.matched_skills.len(),
        skills.len()
    );
    println!(
        "  Experience: {} year(s) extracted, requirement {}",
        evaluation.extracted_experience_years,
        if evaluation.experience_match {
            "met"
        } else {
            "not met"
        }
    );
    println!("  Priority: {}", evaluation.priority);
    for component in &evaluation.priority_components {
        println!(
            "    +{} {:?}: {}",
            component.points, component.factor, component.notes
        );
    }

    match &report.decision {
        AdmissionDecision::Admitted => println!("  Decision: admitted"),
        AdmissionDecision::Rejected { reasons } => {
            println!("  Decision: rejected");
            for reason in reasons {
                println!("    - {reason}");
            }
        }
    }
}
