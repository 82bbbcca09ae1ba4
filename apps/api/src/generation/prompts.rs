// Prompt templates for interview-question generation. Replace `{jd_text}` before sending.

/// Number of questions requested per job description.
pub const QUESTION_COUNT: usize = 5;

/// Generation favours variety over determinism.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Fill-in-the-blank starters offered to recruiters writing their own questions.
pub const QUESTION_TEMPLATES: &[&str] = &[
    "What challenges have you faced in [ROLE]?",
    "How would you approach [TASK] described in the JD?",
    "Give an example of solving a real-world problem relevant to this role.",
];

pub const QUESTION_PROMPT_EN: &str = r#"You are a professional recruiter. Carefully read the following job description:
"""{jd_text}"""

YOUR TASK:
1. Determine the required experience level (entry-level, mid-level or senior-level) from the job description.
2. Generate 5 highly relevant interview questions tailored to that level, assessing:
   - Core technical or functional skills.
   - Real-world problem solving.
   - Fit for the role and organization.

EXPERIENCE LEVELS:
- Entry-level (under 2 years): ask about basic concepts, common tools, workflows and theory.
- Mid-level (2-5 years): ask about hands-on experience, applied scenarios and improvements they contributed.
- Senior-level (5+ years): ask about strategy, architecture, leadership, mentoring and long-term impact.

GUIDELINES:
- Make each question precise and specific to this job description; avoid generic questions.
- No explanation or translation. List only the 5 questions.
- Respond in English, one question per bullet point starting with "- "."#;

pub const QUESTION_PROMPT_VI: &str = r#"Bạn là chuyên gia tuyển dụng. Dưới đây là mô tả công việc:
"""{jd_text}"""

NHIỆM VỤ:
1. Xác định mức độ kinh nghiệm yêu cầu (ít kinh nghiệm, trung bình hoặc cao cấp) dựa trên mô tả công việc.
2. Tạo 5 câu hỏi phỏng vấn chuyên sâu, phù hợp với mức độ đó, để đánh giá:
   - Kỹ năng chuyên môn chính.
   - Khả năng giải quyết vấn đề hoặc xử lý tình huống thực tế.
   - Sự phù hợp với vai trò và tổ chức.

MỨC ĐỘ KINH NGHIỆM:
- Ít kinh nghiệm (dưới 2 năm): hỏi về kiến thức nền tảng, công cụ cơ bản, quy trình đơn giản.
- Trung bình (2-5 năm): hỏi về kinh nghiệm triển khai, phân tích tình huống thực tế, cải tiến công việc.
- Cao cấp (trên 5 năm): hỏi về chiến lược, tầm nhìn hệ thống, quản lý hoặc mentoring.

YÊU CẦU:
- Mỗi câu hỏi phải rõ ràng, cụ thể theo mô tả công việc, tránh chung chung.
- Không giải thích hay dịch. Chỉ liệt kê 5 câu hỏi.
- Trả lời hoàn toàn bằng tiếng Việt, mỗi câu hỏi là một gạch đầu dòng bắt đầu bằng "- "."#;
