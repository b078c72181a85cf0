//! Recruiter prompt for candidate assessments.

use doc_extract::truncate_chars;

/// Fixed instructions placed before the job description and the resume.
pub const ASSESSMENT_INSTRUCTIONS: &str = "You are an experienced technical recruiter. \
Assess how well the candidate below fits the job description: relevant skills, \
experience and notable gaps.";

/// Builds the assessment prompt. `resume_text` is expected to be truncated already.
pub fn build_assessment_prompt(job_description: &str, resume_text: &str) -> String {
    format!(
        "{ASSESSMENT_INSTRUCTIONS}\n\n\
         JOB DESCRIPTION:\n{}\n\n\
         CANDIDATE RESUME:\n{}\n\n\
         Answer in at most 50 words and end with a fit rating out of 10.",
        job_description.trim(),
        resume_text.trim()
    )
}

/// Trims model output and caps it at `max_chars` characters.
pub fn bound_output(raw: &str, max_chars: usize) -> String {
    let text = raw.trim();
    let cut = truncate_chars(text, max_chars);
    if cut.len() == text.len() {
        cut.to_string()
    } else {
        format!("{}…", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_both_sections_in_order() {
        let p = build_assessment_prompt("  Senior Rust engineer ", "Alice, 8y Rust\n");
        let jd = p.find("JOB DESCRIPTION:\nSenior Rust engineer\n").unwrap();
        let cv = p.find("CANDIDATE RESUME:\nAlice, 8y Rust\n").unwrap();
        assert!(p.starts_with(ASSESSMENT_INSTRUCTIONS));
        assert!(jd < cv);
        assert!(p.ends_with("rating out of 10."));
    }

    #[test]
    fn output_is_trimmed_and_capped() {
        assert_eq!(bound_output("  good fit \n", 100), "good fit");
        assert_eq!(bound_output("abcdef", 3), "abc…");
    }
}
