//! Profile Assembler — merges user identity fields and assessment answers into
//! the normalized profile the prompt builder consumes. Pure formatting, no I/O.

use serde_json::{json, Value};

use crate::models::assessment::AssessmentRow;
use crate::models::user::UserRow;

/// Generation input assembled from the user aggregate. Scoped to one
/// orchestration call, never persisted.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub email: String,
    pub full_name: String,
    pub assessment: AssessmentRow,
}

impl UserProfile {
    pub fn assemble(user: &UserRow, assessment: AssessmentRow) -> Self {
        UserProfile {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            assessment,
        }
    }

    /// The career path the user is actually aiming for: the free-text override
    /// when present and non-empty, the enumerated choice otherwise.
    pub fn career_goal(&self) -> &str {
        match self.assessment.other_career_path.as_deref() {
            Some(other) if !other.trim().is_empty() => other,
            _ => &self.assessment.career_path,
        }
    }

    /// Labeled-line rendering used by the job-title prompt. Optional fields
    /// (career-path override, certifications, motivation) are omitted when
    /// absent rather than rendered as empty labels.
    pub fn profile_text(&self) -> String {
        let a = &self.assessment;
        let mut lines = vec![
            format!("Main Goal: {}", a.main_goal),
            format!("Age: {}", a.age_bracket),
            format!("Current Situation: {}", a.current_situation),
            format!("Biggest Challenge: {}", a.biggest_challenge),
            format!("Skill Level: {}/5", a.skill_level),
            format!("Desired Career Path: {}", a.career_path),
        ];

        if let Some(other) = a.other_career_path.as_deref() {
            if !other.trim().is_empty() {
                lines.push(format!("Custom Career Path: {other}"));
            }
        }

        lines.push(format!("Target Timeframe: {}", a.target_timeframe));
        lines.push(format!("Learning Style: {}", a.learning_style));
        lines.push(format!("Previous Courses: {}", a.previous_courses));
        lines.push(format!("Learning Pace: {} hours/week", a.learning_pace));

        if let Some(certs) = a.certifications.as_deref() {
            if !certs.trim().is_empty() {
                lines.push(format!("Certifications: {certs}"));
            }
        }

        if let Some(motivation) = a.motivation.as_deref() {
            if !motivation.trim().is_empty() {
                lines.push(format!("Motivation: {motivation}"));
            }
        }

        lines.push(String::new());
        lines.push(format!("Email: {}", self.email));

        lines.join("\n")
    }

    /// Structured rendering used by the roadmap prompt. Key order is stable
    /// (serde_json sorts map keys), so the rendered blob is deterministic.
    pub fn to_json(&self) -> Value {
        let a = &self.assessment;
        json!({
            "email": self.email,
            "full_name": self.full_name,
            "main_goal": a.main_goal,
            "skill_level": a.skill_level,
            "career_path": self.career_goal(),
            "learning_style": a.learning_style,
            "learning_pace_hours_per_week": a.learning_pace,
            "target_timeframe": a.target_timeframe,
            "previous_courses": a.previous_courses,
            "certifications": a.certifications.as_deref().unwrap_or(""),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::sample_assessment;
    use crate::models::user::sample_user;

    fn sample_profile() -> UserProfile {
        let user = sample_user();
        let assessment = sample_assessment(user.id);
        UserProfile::assemble(&user, assessment)
    }

    #[test]
    fn test_profile_text_renders_required_lines() {
        let text = sample_profile().profile_text();
        assert!(text.contains("Main Goal: switch-career"));
        assert!(text.contains("Skill Level: 4/5"));
        assert!(text.contains("Learning Pace: 5-10 hours/week"));
        assert!(text.contains("Email: ada@example.com"));
    }

    #[test]
    fn test_profile_text_omits_absent_optionals() {
        let text = sample_profile().profile_text();
        assert!(!text.contains("Custom Career Path"));
        assert!(!text.contains("Certifications:"));
        assert!(!text.contains("Motivation:"));
    }

    #[test]
    fn test_profile_text_includes_present_optionals() {
        let mut profile = sample_profile();
        profile.assessment.certifications = Some("CS50".to_string());
        profile.assessment.motivation = Some("Support my parents".to_string());
        let text = profile.profile_text();
        assert!(text.contains("Certifications: CS50"));
        assert!(text.contains("Motivation: Support my parents"));
    }

    #[test]
    fn test_career_goal_prefers_nonempty_override() {
        let mut profile = sample_profile();
        assert_eq!(profile.career_goal(), "web-dev");

        profile.assessment.other_career_path = Some("   ".to_string());
        assert_eq!(profile.career_goal(), "web-dev");

        profile.assessment.other_career_path = Some("game-dev".to_string());
        assert_eq!(profile.career_goal(), "game-dev");
    }

    #[test]
    fn test_to_json_is_deterministic() {
        let profile = sample_profile();
        let a = serde_json::to_string(&profile.to_json()).unwrap();
        let b = serde_json::to_string(&profile.to_json()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_to_json_defaults_missing_certifications_to_empty() {
        let profile = sample_profile();
        let value = profile.to_json();
        assert_eq!(value["certifications"], "");
        assert_eq!(value["career_path"], "web-dev");
    }
}
