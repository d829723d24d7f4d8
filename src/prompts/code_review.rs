use std::collections::BTreeMap;

use rmcp::model::{PromptMessage, PromptMessageRole};

use super::PromptDefinition;
use crate::tools::schema::ArgumentSpec;

pub const CODE_REVIEW_PROMPT_ID: &str = "code-review";

const ARGUMENTS: &[ArgumentSpec] = &[
    ArgumentSpec {
        name: "code",
        description: "Source code to review",
        required: true,
    },
    ArgumentSpec {
        name: "language",
        description: "Programming language of the code",
        required: false,
    },
    ArgumentSpec {
        name: "focus",
        description: "Area to focus on, e.g. performance or security",
        required: false,
    },
];

pub const fn definition() -> PromptDefinition {
    PromptDefinition {
        name: CODE_REVIEW_PROMPT_ID,
        title: "Code Review",
        description: "Request a structured review of a code snippet",
        arguments: ARGUMENTS,
        template: render,
    }
}

fn render(values: &BTreeMap<&'static str, String>) -> Vec<PromptMessage> {
    vec![PromptMessage::new_text(
        PromptMessageRole::User,
        review_request(
            values.get("code").map(String::as_str).unwrap_or_default(),
            values.get("language").map(String::as_str),
            values.get("focus").map(String::as_str),
        ),
    )]
}

/// Render the review request text.
pub fn review_request(code: &str, language: Option<&str>, focus: Option<&str>) -> String {
    let language = language.map(str::trim).filter(|value| !value.is_empty());
    let focus = focus.map(str::trim).filter(|value| !value.is_empty());

    format!(
        "다음 코드를 리뷰해 주세요.\n\
         \n\
         언어: {language_label}\n\
         중점 검토 영역: {focus_label}\n\
         \n\
         ```{fence}\n\
         {code}\n\
         ```\n\
         \n\
         아래 항목별로 나누어 검토해 주세요.\n\
         1. 코드 품질: 가독성, 구조, 명명 규칙\n\
         2. 잠재적 버그: 경계 조건, 오류 처리 누락\n\
         3. 성능: 불필요한 연산, 자료구조 선택\n\
         4. 보안: 입력 검증, 민감 정보 노출\n\
         5. 개선 제안: 구체적인 수정 예시\n\
         6. 모범 사례: 언어 관용구와 표준 준수 여부",
        language_label = language.unwrap_or("지정되지 않음"),
        focus_label = focus.unwrap_or("전반적인 코드 품질"),
        fence = language.unwrap_or_default(),
    )
}
