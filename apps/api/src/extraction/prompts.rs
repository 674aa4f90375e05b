// Prompt constants for the LLM skill extractor.

pub const EXTRACT_SYSTEM: &str = "You are a precise résumé analyst. \
    Extract the candidate's identity and technical skills from résumé text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Replace `{resume_text}` before sending.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract the candidate profile from the résumé below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Jane Smith",
  "email": "jane.smith@example.com",
  "skills": [
    {"name": "Python", "category": "Backend", "weight": 5}
  ]
}

Rules:
- "email" is null when the résumé has none.
- List each skill once. Use the most common spelling ("Node.js", not "node").
- "category" is one of: Frontend, Backend, Database, Cloud, DevOps, Tools, Testing, Other.
- "weight" is an integer 1-5 reflecting how prominent the skill is in the résumé
  (5 = central to recent roles, 1 = mentioned once).
- Only include skills the text actually states. Do NOT infer skills.

Résumé:
---
{resume_text}
---"#;
