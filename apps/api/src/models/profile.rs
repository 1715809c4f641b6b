use serde::{Deserialize, Serialize};

/// Contact block of a candidate profile. Absent values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

/// Highest-level bucket a degree string falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    Doctorate,
    #[serde(rename = "Master's")]
    Masters,
    #[serde(rename = "Bachelor's")]
    Bachelors,
    #[serde(rename = "Associate's")]
    Associates,
    Certification,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<EducationLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillCategory {
    #[default]
    Technical,
    Soft,
    Industry,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub industry: Vec<String>,
}

impl Skills {
    pub fn bucket_mut(&mut self, category: SkillCategory) -> &mut Vec<String> {
        match category {
            SkillCategory::Technical => &mut self.technical,
            SkillCategory::Soft => &mut self.soft,
            SkillCategory::Industry => &mut self.industry,
        }
    }

    /// Pushes a skill into a bucket unless an equal (case-insensitive) entry exists.
    pub fn add(&mut self, category: SkillCategory, skill: &str) {
        let skill = skill.trim();
        if skill.is_empty() {
            return;
        }
        let bucket = self.bucket_mut(category);
        if !bucket.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            bucket.push(skill.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty() && self.industry.is_empty()
    }

    /// All skills in category order, deduplicated across categories.
    pub fn flatten(&self) -> Vec<String> {
        let mut flat: Vec<String> = Vec::new();
        for item in self.technical.iter().chain(&self.soft).chain(&self.industry) {
            if !flat.iter().any(|s| s.eq_ignore_ascii_case(item)) {
                flat.push(item.clone());
            }
        }
        flat
    }
}

/// The normalized candidate profile every extraction route converges on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateProfile {
    pub contact_info: ContactInfo,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Skills,
}

impl CandidateProfile {
    /// Fills empty contact fields and empty sections from `baseline`.
    /// Non-empty values in `self` always win.
    pub fn merge_missing(&mut self, baseline: &CandidateProfile) {
        let contact = &mut self.contact_info;
        for (mine, theirs) in [
            (&mut contact.name, &baseline.contact_info.name),
            (&mut contact.email, &baseline.contact_info.email),
            (&mut contact.phone, &baseline.contact_info.phone),
            (&mut contact.location, &baseline.contact_info.location),
        ] {
            if mine.is_empty() {
                mine.clone_from(theirs);
            }
        }
        if self.education.is_empty() {
            self.education = baseline.education.clone();
        }
        if self.experience.is_empty() {
            self.experience = baseline.experience.clone();
        }
        if self.skills.is_empty() {
            self.skills = baseline.skills.clone();
        }
    }
}
