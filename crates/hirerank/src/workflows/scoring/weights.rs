use serde::{Deserialize, Serialize};

use super::domain::JobId;

/// Raised when a weight set cannot be normalized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

fn normalize<const N: usize>(label: &str, weights: [f64; N]) -> Result<[f64; N], WeightError> {
    if let Some(value) = weights.iter().find(|value| !value.is_finite() || **value < 0.0) {
        return Err(WeightError::InvalidConfiguration {
            reason: format!("{label} weights must be finite and non-negative (found {value})"),
        });
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(WeightError::InvalidConfiguration {
            reason: format!("total {label} weight must be greater than zero"),
        });
    }

    Ok(weights.map(|value| value / total))
}

fn round_percentage(fraction: f64) -> f64 {
    (fraction * 100.0 * 100.0).round() / 100.0
}

/// Relative importance of the five scoring categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub resume_skills: f64,
    pub github_code_quality: f64,
    pub project_originality: f64,
    pub documentation_quality: f64,
    pub engineering_practices: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            resume_skills: 0.25,
            github_code_quality: 0.30,
            project_originality: 0.20,
            documentation_quality: 0.10,
            engineering_practices: 0.15,
        }
    }
}

impl CategoryWeights {
    fn as_array(&self) -> [f64; 5] {
        [
            self.resume_skills,
            self.github_code_quality,
            self.project_originality,
            self.documentation_quality,
            self.engineering_practices,
        ]
    }

    fn from_array(values: [f64; 5]) -> Self {
        let [resume_skills, github_code_quality, project_originality, documentation_quality, engineering_practices] =
            values;
        Self {
            resume_skills,
            github_code_quality,
            project_originality,
            documentation_quality,
            engineering_practices,
        }
    }

    pub fn normalized(&self) -> Result<Self, WeightError> {
        normalize("category", self.as_array()).map(Self::from_array)
    }

    /// Normalized weights as percentages rounded to two decimals.
    ///
    /// The projection is lossy; readers must normalize again rather than
    /// treat the stored values as exact.
    pub fn as_percentages(&self) -> Result<Self, WeightError> {
        let normalized = self.normalized()?;
        Ok(Self::from_array(normalized.as_array().map(round_percentage)))
    }

    /// Inverse of [`CategoryWeights::as_percentages`], before normalization.
    pub fn from_percentages(percentages: &Self) -> Self {
        Self::from_array(percentages.as_array().map(|value| value / 100.0))
    }
}

/// Split of the resume category across its three sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResumeSubWeights {
    pub required_skills: f64,
    pub experience_fit: f64,
    pub nice_to_have: f64,
}

impl Default for ResumeSubWeights {
    fn default() -> Self {
        Self {
            required_skills: 0.60,
            experience_fit: 0.20,
            nice_to_have: 0.20,
        }
    }
}

impl ResumeSubWeights {
    pub fn normalized(&self) -> Result<Self, WeightError> {
        let [required_skills, experience_fit, nice_to_have] = normalize(
            "resume sub",
            [self.required_skills, self.experience_fit, self.nice_to_have],
        )?;
        Ok(Self {
            required_skills,
            experience_fit,
            nice_to_have,
        })
    }
}

/// Per-job scoring policy. Replaced wholesale on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub job_id: JobId,
    #[serde(default)]
    pub category_weights: CategoryWeights,
    #[serde(default)]
    pub resume_subweights: ResumeSubWeights,
    #[serde(default)]
    pub github_required: bool,
}

impl ScoringConfig {
    /// Default policy for a job that never had one saved.
    pub fn for_job(job_id: JobId) -> Self {
        Self {
            job_id,
            category_weights: CategoryWeights::default(),
            resume_subweights: ResumeSubWeights::default(),
            github_required: false,
        }
    }

    pub fn normalized(&self) -> Result<Self, WeightError> {
        Ok(Self {
            job_id: self.job_id.clone(),
            category_weights: self.category_weights.normalized()?,
            resume_subweights: self.resume_subweights.normalized()?,
            github_required: self.github_required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_sum(weights: &CategoryWeights) -> f64 {
        weights.as_array().iter().sum()
    }

    #[test]
    fn normalized_category_weights_sum_to_one() {
        let cases = [
            CategoryWeights::default(),
            CategoryWeights::from_array([1.0, 1.0, 1.0, 1.0, 1.0]),
            CategoryWeights::from_array([25.0, 30.0, 20.0, 10.0, 15.0]),
            CategoryWeights::from_array([0.0, 0.0, 3.0, 0.0, 0.0]),
            CategoryWeights::from_array([1e-9, 7.0, 1e6, 0.3, 42.0]),
        ];

        for weights in cases {
            let normalized = weights.normalized().expect("positive sum normalizes");
            assert!(
                (category_sum(&normalized) - 1.0).abs() < 1e-9,
                "sum drifted for {weights:?}"
            );
        }
    }

    #[test]
    fn zero_sum_category_weights_are_rejected() {
        let zero = CategoryWeights::from_array([0.0; 5]);
        assert!(matches!(
            zero.normalized(),
            Err(WeightError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn negative_weights_are_rejected() {
        let negative = CategoryWeights::from_array([-1.0, 0.5, 0.5, 0.0, 0.0]);
        assert!(negative.normalized().is_err());

        let subweights = ResumeSubWeights {
            required_skills: -2.0,
            experience_fit: 1.0,
            nice_to_have: 0.5,
        };
        assert!(subweights.normalized().is_err());
    }

    #[test]
    fn resume_subweights_normalize_proportionally() {
        let weights = ResumeSubWeights {
            required_skills: 3.0,
            experience_fit: 1.0,
            nice_to_have: 1.0,
        };
        let normalized = weights.normalized().expect("normalizes");
        assert!((normalized.required_skills - 0.6).abs() < 1e-12);
        assert!((normalized.experience_fit - 0.2).abs() < 1e-12);
        assert!((normalized.nice_to_have - 0.2).abs() < 1e-12);
    }

    #[test]
    fn zero_resume_subweights_are_rejected() {
        let weights = ResumeSubWeights {
            required_skills: 0.0,
            experience_fit: 0.0,
            nice_to_have: 0.0,
        };
        assert!(weights.normalized().is_err());
    }

    #[test]
    fn scoring_config_normalization_preserves_identity_and_flag() {
        let config = ScoringConfig {
            job_id: JobId::from("job-7"),
            category_weights: CategoryWeights::from_array([2.0, 2.0, 2.0, 2.0, 2.0]),
            resume_subweights: ResumeSubWeights::default(),
            github_required: true,
        };

        let normalized = config.normalized().expect("normalizes");
        assert_eq!(normalized.job_id, config.job_id);
        assert!(normalized.github_required);
        assert!((normalized.category_weights.resume_skills - 0.2).abs() < 1e-12);
    }

    #[test]
    fn percentages_round_to_two_decimals_and_renormalize_on_read() {
        let weights = CategoryWeights::from_array([1.0, 1.0, 1.0, 0.0, 0.0]);
        let percentages = weights.as_percentages().expect("projects");
        assert_eq!(percentages.resume_skills, 33.33);
        assert_eq!(percentages.documentation_quality, 0.0);

        let restored = CategoryWeights::from_percentages(&percentages)
            .normalized()
            .expect("normalizes");
        assert!((category_sum(&restored) - 1.0).abs() < 1e-9);
        assert!((restored.resume_skills - 1.0 / 3.0).abs() < 1e-9);
    }
}
