//! Book records

use serde::{Deserialize, Serialize};

/// A book in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub summary: String,
    /// Inline paragraphs, used when there is no external document
    pub content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_doc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Book {
    /// External document URL, ignoring empty strings left by the edit form
    pub fn document_url(&self) -> Option<&str> {
        non_empty(self.google_doc_url.as_deref())
    }

    pub fn video(&self) -> Option<&str> {
        non_empty(self.video_url.as_deref())
    }

    /// Case-sensitive substring match on title or author
    pub fn matches(&self, term: &str) -> bool {
        self.title.contains(term) || self.author.contains(term)
    }

    /// Apply the fields present in `patch`
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(url) = patch.google_doc_url {
            self.google_doc_url = Some(url);
        }
        if let Some(url) = patch.video_url {
            self.video_url = Some(url);
        }
    }

    /// Blank record created from the admin "add" action
    pub fn placeholder(id: String) -> Self {
        Self {
            id,
            title: "새 도서".to_string(),
            author: String::new(),
            summary: String::new(),
            content: vec!["내용을 입력하세요.".to_string()],
            google_doc_url: Some(String::new()),
            video_url: None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Partial update of a book
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub content: Option<Vec<String>>,
    pub google_doc_url: Option<String>,
    pub video_url: Option<String>,
}

/// Next id after the largest numeric id in `books`
pub fn next_id(books: &[Book]) -> String {
    let max = books
        .iter()
        .filter_map(|book| book.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

/// Library shipped with the server, used until something is saved
pub fn seed_books() -> Vec<Book> {
    vec![
        Book {
            id: "1".to_string(),
            title: "진달래꽃".to_string(),
            author: "김소월".to_string(),
            summary: "이별의 슬픔을 절제된 언어로 노래한 김소월의 대표 시.".to_string(),
            content: vec![
                "나 보기가 역겨워 가실 때에는 말없이 고이 보내 드리우리다.".to_string(),
                "영변에 약산 진달래꽃 아름 따다 가실 길에 뿌리우리다.".to_string(),
                "가시는 걸음걸음 놓인 그 꽃을 사뿐히 즈려밟고 가시옵소서.".to_string(),
                "나 보기가 역겨워 가실 때에는 죽어도 아니 눈물 흘리우리다.".to_string(),
            ],
            google_doc_url: None,
            video_url: None,
        },
        Book {
            id: "2".to_string(),
            title: "운수 좋은 날".to_string(),
            author: "현진건".to_string(),
            summary: "인력거꾼 김첨지의 하루를 통해 식민지 도시 빈민의 삶을 그린 단편.".to_string(),
            content: vec![
                "새침하게 흐린 품이 눈이 올 듯하더니 눈은 아니 오고 얼다가 만 비가 추적추적 내리는 날이었다.".to_string(),
                "이날이야말로 동소문 안에서 인력거꾼 노릇을 하는 김첨지에게는 오래간만에도 닥친 운수 좋은 날이었다.".to_string(),
            ],
            google_doc_url: None,
            video_url: None,
        },
        Book {
            id: "3".to_string(),
            title: "메밀꽃 필 무렵".to_string(),
            author: "이효석".to_string(),
            summary: "봉평 장터를 떠도는 장돌뱅이 허생원의 여름밤 이야기.".to_string(),
            content: vec![
                "여름 장이란 애시당초에 글러서, 해는 아직 중천에 있건만 장판은 벌써 쓸쓸하고 더운 햇발이 벌여놓은 전휘장 밑으로 등줄기를 훅훅 볶는다.".to_string(),
            ],
            google_doc_url: None,
            video_url: None,
        },
    ]
}
