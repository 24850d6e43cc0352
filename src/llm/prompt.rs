//! Prompt construction — pure, no network access.

/// Build the persona-synthesis prompt from question/answer pairs.
///
/// Questions and answers are zipped positionally; extra items on either
/// side are ignored.
pub fn build_persona_prompt(questions: &[&str], answers: &[String]) -> String {
    let qa_block = questions
        .iter()
        .zip(answers)
        .map(|(q, a)| format!("{q}: {a}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the customer's answers and create 5 persona profiles for a sales funnel.\n\
         \n\
         Customer answers:\n\
         {qa_block}\n\
         \n\
         For each persona include:\n\
         - **Persona name**\n\
         - **Description** (2-3 sentences)\n\
         - **Pains and needs**\n\
         - **Purchase motivation**\n\
         - **Objections**\n\
         \n\
         Output format: a structured list of 5 personas."
    )
}
