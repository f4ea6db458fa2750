use std::collections::HashMap;

use once_cell::sync::Lazy;

static SKILL_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("js", "JavaScript"),
        ("javascript", "JavaScript"),
        ("ts", "TypeScript"),
        ("typescript", "TypeScript"),
        ("py", "Python"),
        ("python3", "Python"),
        ("ai", "Artificial Intelligence"),
        ("ml", "Machine Learning"),
        ("dl", "Deep Learning"),
        ("nlp", "Natural Language Processing"),
        ("k8s", "Kubernetes"),
        ("node", "Node.js"),
        ("nodejs", "Node.js"),
        ("reactjs", "React"),
        ("react.js", "React"),
        ("vuejs", "Vue.js"),
        ("golang", "Go"),
        ("postgres", "PostgreSQL"),
        ("psql", "PostgreSQL"),
        ("mongo", "MongoDB"),
        ("aws", "AWS"),
        ("gcp", "Google Cloud Platform"),
        ("html5", "HTML"),
        ("css3", "CSS"),
        ("sql", "SQL"),
        ("tf", "TensorFlow"),
        ("cpp", "C++"),
        ("c#", "C#"),
        ("csharp", "C#"),
        ("ci/cd", "CI/CD"),
        ("rb", "Ruby"),
    ])
});

static TITLE_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("swe", "Software Engineer"),
        ("sde", "Software Development Engineer"),
        ("sre", "Site Reliability Engineer"),
        ("pm", "Product Manager"),
        ("qa", "Quality Assurance Engineer"),
        ("cto", "Chief Technology Officer"),
        ("ceo", "Chief Executive Officer"),
    ])
});

static TITLE_WORD_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("sr", "Senior"),
        ("snr", "Senior"),
        ("jr", "Junior"),
        ("mgr", "Manager"),
        ("eng", "Engineer"),
        ("engr", "Engineer"),
        ("dev", "Developer"),
        ("assoc", "Associate"),
        ("asst", "Assistant"),
        ("dir", "Director"),
        ("vp", "Vice President"),
    ])
});

/// Maps a skill alias to its canonical display form; unknown skills pass through trimmed.
pub fn normalize_skill(skill: &str) -> String {
    let trimmed = skill.trim();
    SKILL_ALIASES
        .get(trimmed.to_lowercase().as_str())
        .map(|canonical| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if let Some(canonical) = TITLE_ALIASES.get(trimmed.to_lowercase().as_str()) {
        return canonical.to_string();
    }

    trimmed
        .split_whitespace()
        .map(|word| {
            let key = word.trim_end_matches('.').to_lowercase();
            TITLE_WORD_ALIASES
                .get(key.as_str())
                .map(|canonical| canonical.to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_skill_maps_aliases_in_order() {
        let skills: Vec<String> = ["js", "py", "ai"].iter().map(|s| normalize_skill(s)).collect();
        assert_eq!(skills, vec!["JavaScript", "Python", "Artificial Intelligence"]);
    }

    #[test]
    fn normalize_skill_is_case_insensitive_and_passes_unknowns_through() {
        assert_eq!(normalize_skill(" K8S "), "Kubernetes");
        assert_eq!(normalize_skill("Rust"), "Rust");
        assert_eq!(normalize_skill("  Terraform "), "Terraform");
    }

    #[test]
    fn normalize_title_expands_whole_titles_and_word_prefixes() {
        assert_eq!(normalize_title("SWE"), "Software Engineer");
        assert_eq!(normalize_title("Sr. Dev"), "Senior Developer");
        assert_eq!(normalize_title("Jr Data Eng."), "Junior Data Engineer");
    }

    #[test]
    fn normalize_title_leaves_canonical_titles_untouched() {
        assert_eq!(normalize_title("Software Engineer"), "Software Engineer");
        assert_eq!(normalize_title("  Staff   Engineer "), "Staff Engineer");
        assert_eq!(normalize_title(""), "");
    }
}
