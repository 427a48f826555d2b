//! Review prompt assembly.
//!
//! A prompt is an ordered list of labelled [`Section`]s rendered with a blank
//! line between them. The two [`PromptVariant`]s share everything except the
//! intro and the closing instruction.

use crate::git_providers::types::{ChangeSet, MrInfo};
use crate::lang::is_reviewable_path;

const FILES_HEADER: &str = "변경된 파일:";
const EMPTY_DIFF: &str = "변경사항 없음";

/// Which kind of review the model is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    /// Whole-MR review posted on open/update.
    FullReview,
    /// Short answer to a comment that asked for something specific.
    TargetedComment,
}

impl PromptVariant {
    fn intro(self) -> &'static str {
        match self {
            PromptVariant::FullReview => {
                "다음 GitLab Merge Request의 코드 변경 사항을 시니어 개발자가 해준다는 느낌으로 분석하고 리뷰해주세요:"
            }
            PromptVariant::TargetedComment => {
                "다음 GitLab Merge Request의 코드 변경 사항 중 제가 원하는 부분만 시니어 개발자가 해준다는 느낌으로 분석하고 리뷰해주세요:"
            }
        }
    }

    fn closing(self) -> &'static str {
        match self {
            PromptVariant::FullReview => {
                "위 코드 변경사항에 대하여\n코드 품질, 잠재적 문제점, 성능 고려사항, 개선 제안\n을 간략하게 대략 500 ~ 700자 안으로 구체적인 코드 부분과 함께 분석해주세요."
            }
            PromptVariant::TargetedComment => {
                "위 코드 변경사항에서 제가 원하는 부분을\n간략하게 대략 300자 안으로 분석해주세요."
            }
        }
    }
}

/// One block of the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// Free text rendered verbatim.
    Text(String),
    /// `label: value` line.
    Field { label: &'static str, value: String },
    /// One changed file with its raw diff.
    File { path: String, diff: String },
}

impl Section {
    fn render_into(&self, out: &mut String) {
        match self {
            Section::Text(t) => out.push_str(t),
            Section::Field { label, value } => {
                out.push_str(label);
                out.push_str(": ");
                out.push_str(value);
            }
            Section::File { path, diff } => {
                out.push_str("파일: ");
                out.push_str(path);
                out.push_str("\n변경사항:\n");
                out.push_str(diff);
            }
        }
    }
}

/// Ordered section list; see [`build_prompt`] for the standard layout.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<Section>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.sections.push(Section::Text(text.into()));
        self
    }

    pub fn field(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.sections.push(Section::Field {
            label,
            value: value.into(),
        });
        self
    }

    /// Adds one section per reviewable file, in provider order.
    pub fn files(mut self, changes: &ChangeSet) -> Self {
        for change in &changes.changes {
            let Some(path) = change.path() else {
                continue;
            };
            if !is_reviewable_path(path) {
                continue;
            }
            self.sections.push(Section::File {
                path: path.to_string(),
                diff: change.diff.clone().unwrap_or_else(|| EMPTY_DIFF.to_string()),
            });
        }
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, s) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            s.render_into(&mut out);
        }
        out.push('\n');
        out
    }
}

/// Standard layout: intro, title, description, optional user request, file
/// sections, closing instruction. A blank `instruction` is left out.
pub fn build_prompt(
    changes: &ChangeSet,
    info: &MrInfo,
    instruction: Option<&str>,
    variant: PromptVariant,
) -> String {
    let mut b = PromptBuilder::new()
        .text(variant.intro())
        .field("MR 제목", info.title.as_str())
        .field("MR 설명", info.description.as_str());

    if let Some(req) = instruction.map(str::trim).filter(|s| !s.is_empty()) {
        b = b.field("사용자 요청", req);
    }

    b.text(FILES_HEADER)
        .files(changes)
        .text(variant.closing())
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git_providers::types::FileChange;

    fn change(path: &str, diff: &str) -> FileChange {
        FileChange {
            old_path: Some(path.into()),
            new_path: Some(path.into()),
            diff: Some(diff.into()),
        }
    }

    fn sample() -> ChangeSet {
        ChangeSet {
            changes: vec![
                change("README.md", "+docs"),
                change("main.go", "+func main() {}"),
                change("pkg/util.PY", "+def f(): pass"),
            ],
        }
    }

    #[test]
    fn only_code_files_are_included_in_order() {
        let b = PromptBuilder::new().files(&sample());
        let paths: Vec<&str> = b
            .sections
            .iter()
            .filter_map(|s| match s {
                Section::File { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(paths, vec!["main.go", "pkg/util.PY"]);
    }

    #[test]
    fn full_review_layout() {
        let info = MrInfo::from_parts(Some("Add retry".into()), None);
        let p = build_prompt(&sample(), &info, None, PromptVariant::FullReview);

        assert!(p.starts_with("다음 GitLab Merge Request의 코드 변경 사항을"));
        assert!(p.contains("MR 제목: Add retry"));
        assert!(p.contains("MR 설명: 설명 없음"));
        assert!(!p.contains("사용자 요청"));
        assert!(p.contains("파일: main.go\n변경사항:\n+func main() {}"));
        assert!(!p.contains("README.md"));
        assert!(p.contains("500 ~ 700자"));

        let title = p.find("MR 제목").unwrap();
        let file = p.find("파일: main.go").unwrap();
        let closing = p.find("위 코드 변경사항").unwrap();
        assert!(title < file && file < closing);
    }

    #[test]
    fn targeted_comment_carries_instruction() {
        let p = build_prompt(
            &sample(),
            &MrInfo::default(),
            Some("  null 체크 봐주세요 "),
            PromptVariant::TargetedComment,
        );
        assert!(p.contains("제가 원하는 부분만"));
        assert!(p.contains("사용자 요청: null 체크 봐주세요\n"));
        assert!(p.contains("300자"));
    }

    #[test]
    fn blank_instruction_is_omitted() {
        let p = build_prompt(
            &ChangeSet::default(),
            &MrInfo::default(),
            Some("   "),
            PromptVariant::TargetedComment,
        );
        assert!(!p.contains("사용자 요청"));
    }

    #[test]
    fn missing_diff_gets_placeholder() {
        let cs = ChangeSet {
            changes: vec![FileChange {
                old_path: None,
                new_path: Some("a.ts".into()),
                diff: None,
            }],
        };
        let p = build_prompt(&cs, &MrInfo::default(), None, PromptVariant::FullReview);
        assert!(p.contains("파일: a.ts\n변경사항:\n변경사항 없음"));
    }
}
