// Grading prompt templates. Replace `{question}` and `{answer}` before sending.

use crate::language::Locale;

/// Sampling temperature for grading calls. Kept low so repeated grading agrees.
pub const GRADING_TEMPERATURE: f32 = 0.2;

pub const GRADING_PROMPT_EN: &str = r#"You are a senior interviewer grading a candidate's written answer.

INTERVIEW QUESTION:
"""{question}"""

CANDIDATE ANSWER:
"""{answer}"""

Grade the answer for correctness, depth and relevance to the question.

Return a single JSON object with this EXACT schema (no extra fields):
{
  "score": 85,
  "comment": "Short assessment of the answer",
  "suggestion": "How the candidate could improve the answer"
}

HARD RULES:
1. `score` is an integer from 0 to 100
2. An empty or missing answer scores 0
3. A fully correct and complete answer scores exactly 100
4. `comment` is one or two sentences in English
5. `suggestion` may be an empty string when nothing needs improving
6. Respond with the JSON object only"#;

pub const GRADING_PROMPT_VI: &str = r#"Bạn là người phỏng vấn cấp cao đang chấm điểm câu trả lời viết của ứng viên.

CÂU HỎI PHỎNG VẤN:
"""{question}"""

CÂU TRẢ LỜI CỦA ỨNG VIÊN:
"""{answer}"""

Đánh giá câu trả lời theo độ chính xác, chiều sâu và mức độ liên quan đến câu hỏi.

Trả về MỘT đối tượng JSON theo ĐÚNG cấu trúc sau (không thêm trường khác):
{
  "score": 85,
  "comment": "Nhận xét ngắn gọn về câu trả lời",
  "suggestion": "Cách ứng viên có thể cải thiện câu trả lời"
}

QUY TẮC BẮT BUỘC:
1. `score` là số nguyên từ 0 đến 100
2. Câu trả lời trống hoặc không có thì được 0 điểm
3. Câu trả lời hoàn toàn đúng và đầy đủ được đúng 100 điểm
4. `comment` dài một hoặc hai câu, viết bằng tiếng Việt
5. `suggestion` có thể là chuỗi rỗng nếu không cần cải thiện
6. Chỉ trả về đối tượng JSON"#;

/// Renders the grading prompt for `locale`. Pure templating.
pub fn build_grading_prompt(question: &str, answer: &str, locale: Locale) -> String {
    let template = match locale {
        Locale::Vi => GRADING_PROMPT_VI,
        Locale::En => GRADING_PROMPT_EN,
    };
    fill_placeholders(template, question, answer)
}

/// Single pass over the template: placeholder text inside `question` or `answer` is
/// copied verbatim, never substituted.
fn fill_placeholders(template: &str, question: &str, answer: &str) -> String {
    let mut out = String::with_capacity(template.len() + question.len() + answer.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{question}") {
            out.push_str(question);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{answer}") {
            out.push_str(answer);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
