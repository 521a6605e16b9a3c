//! Pre-defined keyword and CPV code templates for common industries.
//!
//! A template name resolves to a default keyword set and CPV code set;
//! unknown names resolve to empty sets rather than an error, so callers can
//! pass user input straight through.

/// Keyword and CPV defaults for one industry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub keywords: Vec<String>,
    pub cpv_codes: Vec<String>,
}

pub struct IndustryTemplates;

impl IndustryTemplates {
    pub fn get(name: &str) -> Option<Template> {
        let (keywords, cpv_codes): (&[&str], &[&str]) = match name {
            "it-software" => (
                &[
                    "software development",
                    "IT services",
                    "system integration",
                    "cloud services",
                    "database",
                    "web development",
                    "mobile app",
                    "cybersecurity",
                    "data analytics",
                    "artificial intelligence",
                    "machine learning",
                    "digital transformation",
                    "ERP system",
                ],
                &[
                    "72000000", "72100000", "72200000", "72300000", "72400000", "72500000",
                    "72600000",
                ],
            ),
            "construction" => (
                &[
                    "construction",
                    "building",
                    "renovation",
                    "infrastructure",
                    "road construction",
                    "bridge",
                    "civil engineering",
                    "architecture",
                    "project management",
                    "facility management",
                    "maintenance",
                    "electrical installation",
                    "plumbing",
                    "HVAC installation",
                ],
                &[
                    "45000000", "45100000", "45200000", "45300000", "45400000", "45500000",
                ],
            ),
            "healthcare" => (
                &[
                    "medical equipment",
                    "healthcare services",
                    "hospital",
                    "medical supplies",
                    "pharmaceutical",
                    "medical devices",
                    "laboratory equipment",
                    "diagnostic equipment",
                    "patient care",
                    "medical software",
                    "telemedicine",
                    "health information system",
                ],
                &[
                    "33000000", "33100000", "33600000", "85100000", "85110000", "85200000",
                ],
            ),
            "consulting" => (
                &[
                    "consulting services",
                    "management consulting",
                    "business consulting",
                    "strategic planning",
                    "process improvement",
                    "organizational development",
                    "change management",
                    "project management",
                    "advisory services",
                    "feasibility study",
                    "market research",
                    "business analysis",
                ],
                &[
                    "73000000", "73100000", "73200000", "79000000", "79400000", "79500000",
                ],
            ),
            "engineering" => (
                &[
                    "engineering services",
                    "technical consulting",
                    "design services",
                    "mechanical engineering",
                    "electrical engineering",
                    "civil engineering",
                    "environmental engineering",
                    "project engineering",
                    "system design",
                    "technical documentation",
                    "feasibility study",
                    "technical support",
                ],
                &[
                    "71000000", "71200000", "71300000", "71400000", "71500000", "71600000",
                ],
            ),
            "environmental" => (
                &[
                    "environmental services",
                    "waste management",
                    "water treatment",
                    "environmental consulting",
                    "pollution control",
                    "renewable energy",
                    "sustainability",
                    "environmental monitoring",
                    "remediation",
                    "recycling",
                    "air quality",
                    "environmental impact assessment",
                ],
                &[
                    "90000000", "90100000", "90200000", "90300000", "90700000", "90900000",
                ],
            ),
            "education" => (
                &[
                    "educational services",
                    "training",
                    "e-learning",
                    "curriculum development",
                    "educational technology",
                    "learning management system",
                    "assessment",
                    "educational consulting",
                    "teacher training",
                    "educational materials",
                    "distance learning",
                    "educational software",
                ],
                &[
                    "80000000", "80100000", "80200000", "80300000", "80400000", "80500000",
                ],
            ),
            "transportation" => (
                &[
                    "transportation services",
                    "logistics",
                    "fleet management",
                    "public transport",
                    "vehicle maintenance",
                    "traffic management",
                    "transport planning",
                    "mobility services",
                    "freight transport",
                    "passenger transport",
                    "transport infrastructure",
                ],
                &[
                    "60000000", "60100000", "60200000", "60400000", "60500000", "34000000",
                ],
            ),
            "energy" => (
                &[
                    "energy services",
                    "renewable energy",
                    "solar power",
                    "wind energy",
                    "energy efficiency",
                    "power generation",
                    "electricity",
                    "gas supply",
                    "energy management",
                    "smart grid",
                    "battery systems",
                    "energy storage",
                ],
                &[
                    "09000000", "65000000", "65100000", "65200000", "65300000", "71310000",
                ],
            ),
            _ => return None,
        };

        Some(Template {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            cpv_codes: cpv_codes.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Keywords for a template; empty for unknown names.
    pub fn get_keywords(name: &str) -> Vec<String> {
        Self::get(name).map(|t| t.keywords).unwrap_or_default()
    }

    /// CPV codes for a template; empty for unknown names.
    pub fn get_cpv_codes(name: &str) -> Vec<String> {
        Self::get(name).map(|t| t.cpv_codes).unwrap_or_default()
    }

    pub fn list() -> Vec<&'static str> {
        vec![
            "it-software",
            "construction",
            "healthcare",
            "consulting",
            "engineering",
            "environmental",
            "education",
            "transportation",
            "energy",
        ]
    }
}
