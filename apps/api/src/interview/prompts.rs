// All prompt template constants for the interview engine.
// Templates are parameterized with `{placeholder}` markers replaced at call
// sites; the persona biography is always sent as a separate system message.

/// Opening utterance for a session. Replace `{mode}` before sending.
pub const INTRODUCTION_TEMPLATE: &str = "\
Open a {mode} interview with the candidate whose resume appears in your \
instructions. Introduce yourself by name, mention the role being interviewed \
for, and briefly explain how the session will run. Do not ask the first \
question yet. Two to four sentences, spoken aloud.";

/// Technical question-bank generation. Replace `{focus_areas}`.
/// Schema-constrained: the response must be a JSON object with a `questions`
/// array of strings.
pub const TECHNICAL_QUESTIONS_TEMPLATE: &str = r#"Using the job description and candidate resume in your instructions, write the question bank for a technical interview.

Focus areas requested by the candidate: {focus_areas}

Rules:
- Write exactly 5 questions.
- Every question must be answerable out loud, without a whiteboard or editor.
- Ground each question in something concrete: a technology from the job description, a project on the resume, or a requested focus area.
- Order the questions from warm-up to most demanding.
- Ask about tradeoffs, failure modes, and decisions actually made, not trivia.

Return a JSON object with this EXACT shape (no extra fields):
{"questions": ["..."]}"#;

/// Behavioral question-bank generation. Replace `{focus_areas}`.
/// Same response shape as the technical template.
pub const BEHAVIORAL_QUESTIONS_TEMPLATE: &str = r#"Using the job description and candidate resume in your instructions, write the question bank for a behavioral interview.

Focus areas requested by the candidate: {focus_areas}

Rules:
- Write exactly 5 questions.
- Each question must ask for a specific past situation ("tell me about a time..."), not a hypothetical.
- Cover a spread: teamwork, conflict, ownership, failure, and growth.
- Tie at least two questions to experiences visible on the resume.

Return a JSON object with this EXACT shape (no extra fields):
{"questions": ["..."]}"#;

/// Probing reply to the candidate's latest answer. Used when the alternation
/// flag says this turn digs deeper.
pub const FOLLOW_UP_TEMPLATE: &str = "\
The candidate just answered your question. Ask exactly one follow-up that \
digs deeper into their answer: a detail they skipped, a claim worth \
pressure-testing, or a consequence they did not address. Stay on the same \
topic. One or two sentences, spoken aloud, in character.";

/// Transition reply. Used when the alternation flag says this turn closes the
/// current topic so the next bank question can be asked.
pub const WRAP_UP_TEMPLATE: &str = "\
The candidate just answered your follow-up. Briefly acknowledge their answer \
and close out the current topic so the interview can move on. Do not ask \
another question and do not introduce a new topic. One or two sentences, \
spoken aloud, in character.";

/// Closing utterance once the question bank is exhausted.
pub const CLOSER_TEMPLATE: &str = "\
The interview is over. Thank the candidate for their time, mention one \
genuine highlight from the conversation, and explain the next steps in the \
hiring process. Do not ask any further questions. Two to four sentences, \
spoken aloud, in character.";

/// Per-pair evaluation prompt. Replace `{question}` and `{answer}`.
/// Schema-constrained to the Evaluation shape.
pub const FEEDBACK_TEMPLATE: &str = r#"You are an expert interview coach evaluating one interview answer.

INTERVIEW QUESTION:
{question}

CANDIDATE'S ANSWER:
{answer}

Evaluate the answer on its own merits: directness, specificity, structure, and relevance to the question. Be specific to what the candidate actually said.

Return a JSON object with this EXACT shape (no extra fields):
{
  "strengths": ["specific point the candidate handled well"],
  "areas_for_improvement": ["specific weakness in this answer"],
  "suggestions": ["actionable change for future answers"],
  "grade": "a letter grade A, B, C, D, or F, optionally with + or -"
}"#;

/// Holistic end-of-session feedback. Replace `{transcript}`.
pub const HOLISTIC_FEEDBACK_TEMPLATE: &str = "\
You are an expert interview coach providing overall feedback on a full mock \
interview.

Here are the questions and responses:

{transcript}

Based on all these responses, give a holistic assessment of the candidate's \
performance across the whole session: patterns you observed, general \
strengths, and general weaknesses. Write in the first person, speaking \
directly to the candidate, without any letter framing or sign-off. Be \
concise but comprehensive, leading with the most important patterns.";

/// Selects the question-bank template for an interview mode.
pub fn question_template(mode: &str) -> Option<&'static str> {
    match mode {
        "technical" => Some(TECHNICAL_QUESTIONS_TEMPLATE),
        "behavioral" => Some(BEHAVIORAL_QUESTIONS_TEMPLATE),
        _ => None,
    }
}
