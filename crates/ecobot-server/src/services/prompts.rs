//! Prompt text sent to the model provider.

use crate::models::games::Difficulty;

/// Seeds every new chat transcript (sent as the first user turn)
pub const CHAT_SYSTEM_PROMPT: &str = r#"You are a Sustainability Expert Bot that teaches users about environmental sustainability. You work in two modes.

1. INFORMATION MODE: answer questions about sustainability topics (climate change, renewable energy, biodiversity, the SDGs, waste management, water conservation, green technology, sustainable agriculture, deforestation, pollution, environmental policy, the circular economy, sustainable transport, eco-friendly lifestyles). Keep answers short: at most 3-4 brief paragraphs. Politely decline questions that are not about the environment.

2. QUIZ MODE: when the user asks for a quiz or a question ("quiz", "test me", "give me a question"), ask one short multiple-choice (A, B, C, D) or true/false question and explain the answer after the user responds.

COMPARISONS: when asked to compare two or more concepts, answer with an HTML table using class "comparison-table", one column per concept, a header with the concept name and a bulleted list in each cell.

Keep the conversation context. If you just asked a quiz question and the user replies with an answer such as "A", "B", "C", "D", "True" or "False", treat it as their answer and tell them whether it is correct, with a brief explanation.

Be friendly and engaging, use bullet points where they help, and aim for 150-200 words per reply."#;

/// Model turn that closes the seed pair
pub const CHAT_SEED_ACK: &str =
    "I understand. I'll act as a Sustainability Expert Bot with the capabilities you described.";

pub const QUIZ_PROMPT: &str = r#"Generate 10 multiple-choice questions about environmental sustainability.
Each question has 4 options (A, B, C, D) and exactly one correct answer.

Return a JSON array where every element has this structure:
{
    "question": "The question text",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correct_answer": "The correct option letter (A, B, C, or D)",
    "explanation": "Brief explanation of why the answer is correct"
}

Cover diverse topics: climate change, renewable energy, biodiversity, waste management, water conservation, sustainable agriculture, pollution and eco-friendly practices. Vary the difficulty.

IMPORTANT: Return ONLY the JSON array with no additional text or formatting."#;

pub const SCENARIOS_PROMPT: &str = r#"Generate 10 interactive scenarios for an environmental adventure game.
Each scenario presents an environmental dilemma whose choices have different ecological impacts.

Return a JSON array where every element has this structure:
{
    "id": 1,
    "description": "Detailed description of the environmental scenario",
    "environment": "forest",
    "hint": "An educational hint about the environmental issue",
    "choices": [
        {
            "id": "1A",
            "text": "Choice text",
            "points": 15,
            "feedback": "Feedback about the impact of this choice",
            "next": 2
        }
    ]
}

Rules:
1. ids run from 1 to 10; "environment" is one of forest, ocean, urban, desert
2. every scenario has 3-4 choices with varying environmental impact
3. points range from -10 (harmful) to +15 (very beneficial)
4. every choice leads to the next scenario (choice.next = scenario id + 1), so scenario 10 leads to 11
5. feedback is detailed and educational
6. cover diverse issues: pollution, conservation, energy, water and more"#;

/// Word list prompt for the given tier and game mode
pub fn words_prompt(difficulty: Difficulty, mode: &str, count: usize) -> String {
    let lead = match difficulty {
        Difficulty::Easy => format!(
            "Generate {} sustainability-related words that are easy to guess (4-6 letters).",
            count
        ),
        Difficulty::Medium => format!(
            "Generate {} sustainability-related words of medium difficulty (6-8 letters).",
            count
        ),
        Difficulty::Hard => format!(
            "Generate {} challenging sustainability-related words (8-12 letters).",
            count
        ),
    };

    format!(
        r#"{lead} The words are for a {mode} word game. Include technical terms about environmental sustainability, conservation and renewable energy.

Return a JSON array with this structure:
[
    {{"word": "RECYCLE", "hint": "Process of converting waste into reusable material"}},
    {{"word": "SOLAR", "hint": "Relating to energy from the sun"}}
]

Make sure:
1. every word is a single word (no spaces or hyphens) of at most {max} letters
2. words relate to environmental sustainability
3. hints are clear but do not give the answer away
4. words suit the {difficulty} difficulty level
5. all words are UPPERCASE"#,
        max = difficulty.max_length(),
    )
}
