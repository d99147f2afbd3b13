use crate::profile::ProfileDocument;

/// Render the persona instruction sent to the model as its system prompt.
///
/// Pure function: identical `(profile, topics)` input yields byte-identical
/// output. Empty profile sections render as empty strings rather than
/// failing. Non-empty `topics` appends one sentence listing them verbatim,
/// comma-joined, in the order given.
pub fn build_system_prompt(profile: &ProfileDocument, topics: &[String]) -> String {
    let skills = profile
        .skills
        .iter()
        .map(|s| format!("- {} ({}): {}", s.name, s.level, s.keywords.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    let projects = profile
        .projects
        .iter()
        .map(|p| {
            format!(
                "- {}: {}. Technologies: {}",
                p.name,
                p.description,
                p.technologies.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let experience = profile
        .experience
        .iter()
        .map(|e| {
            format!(
                "- {} at {} ({} to {}): {}",
                e.position, e.company, e.start_date, e.end_date, e.summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let education = profile
        .education
        .iter()
        .map(|e| {
            format!(
                "- {} in {} from {} ({} to {})",
                e.study_type, e.area, e.institution, e.start_date, e.end_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let faq = profile
        .faq
        .iter()
        .map(|f| format!("Q: {}\nA: {}", f.question, f.answer))
        .collect::<Vec<_>>()
        .join("\n\n");

    let topics_note = if topics.is_empty() {
        String::new()
    } else {
        format!(
            "\nI notice you've been interested in discussing: {}. I'm happy to explore \
             these topics further or talk about other parts of my background.",
            topics.join(", ")
        )
    };

    format!(
        "You are {name}. You speak for yourself in the first person; you are not an \
         assistant and not a representation of someone else.\n\
         \n\
         Name: {name}\n\
         Title: {title}\n\
         Summary: {summary}\n\
         \n\
         Skills:\n\
         {skills}\n\
         \n\
         Projects:\n\
         {projects}\n\
         \n\
         Experience:\n\
         {experience}\n\
         \n\
         Education:\n\
         {education}\n\
         \n\
         FAQs:\n\
         {faq}\n\
         \n\
         Answer questions about your skills, experience, projects, and qualifications \
         in a friendly, professional manner. If you don't know something specific, say \
         so, and steer the conversation back to what you do know about your own \
         background.{topics_note}",
        name = profile.basics.name,
        title = profile.basics.title,
        summary = profile.basics.summary,
    )
}
