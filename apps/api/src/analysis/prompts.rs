// Prompt constants for the extraction and analysis stages.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Fills `{placeholder}` keys in one left-to-right pass, so substituted
/// values are never scanned for further placeholders.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((pos, key, value)) = vars
        .iter()
        .filter_map(|(key, value)| rest.find(key).map(|pos| (pos, *key, *value)))
        .min_by_key(|(pos, _, _)| *pos)
    {
        out.push_str(&rest[..pos]);
        out.push_str(value);
        rest = &rest[pos + key.len()..];
    }
    out.push_str(rest);
    out
}

/// System prompt for structured profile extraction.
pub const EXTRACTION_SYSTEM: &str =
    "You are an expert resume parser. You convert raw resume text into a \
    structured candidate profile, copying values exactly as written.";

/// Profile extraction prompt template. Replace `{resume_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the candidate profile from the resume text below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "contactInfo": {
    "name": "Jane Doe",
    "email": "jane@example.com",
    "phone": "+1 512 555 0199",
    "location": "Austin, TX"
  },
  "education": [
    {
      "institution": "University of Texas",
      "degree": "B.S. Computer Science",
      "field": "Computer Science",
      "year": "2018",
      "gpa": "3.8"
    }
  ],
  "experience": [
    {
      "company": "Acme Corp",
      "title": "Software Engineer",
      "startDate": "2019-01",
      "endDate": "Present",
      "description": "Built the billing pipeline."
    }
  ],
  "skills": {
    "technical": ["Rust", "PostgreSQL"],
    "soft": ["Mentoring"],
    "industry": ["Payments"]
  }
}

Rules:
- Dates use the YYYY-MM format when the month is known, otherwise YYYY.
- An ongoing role has "endDate": "Present".
- Preserve the original wording of titles, company names and descriptions.
- Every education entry needs an institution and a degree; every experience
  entry needs a company and a title. Omit entries missing either.
- Use empty strings and empty arrays for anything not present.

RESUME TEXT:
{resume_text}"#;

/// System prompt for resume-to-job analysis.
pub const ANALYSIS_SYSTEM: &str =
    "You are an experienced technical recruiter. You compare a candidate \
    profile with a job description and report an evidence-based assessment.";

/// Analysis prompt template. Replace `{profile_json}` and `{job_description}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Compare the candidate profile with the job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "educationLevel": "Bachelor's in Computer Science",
  "yearsExperience": "5 years",
  "skillsMatch": "High",
  "keySkills": {
    "technical": ["Rust"],
    "soft": ["Communication"],
    "industry": ["Fintech"]
  },
  "missingRequirements": {
    "technical": ["Kubernetes"],
    "soft": [],
    "industry": []
  },
  "overallScore": 82,
  "analysis": {
    "strengths": ["Five years building payment systems in Rust"],
    "gaps": ["No container orchestration experience"],
    "recommendations": ["Probe for Kubernetes exposure in the interview"]
  }
}

Rules:
- "skillsMatch" is exactly one of "High", "Medium" or "Low".
- "overallScore" is an integer from 0 to 100.
- "keySkills" lists candidate skills the job asks for, by category.
- "missingRequirements" lists job requirements the profile does not show.
- Every statement must be backed by the profile or the job description.

CANDIDATE PROFILE:
{profile_json}

JOB DESCRIPTION:
{job_description}"#;
