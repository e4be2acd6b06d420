//! Knowledge-base articles

use serde_json::Value;
use shared::{EntityBase, Fields, FromJson, Jsonable, Result, Shape, WireEnum};

/// Visibility of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnowledgeScope {
    /// Visible to the owner only
    Private,
    Public,
}

impl WireEnum for KnowledgeScope {
    type Code = &'static str;
    const FAMILY: &'static str = "KnowledgeScope";
    const FALLBACK: Self = KnowledgeScope::Private;
    const ALL: &'static [Self] = &[KnowledgeScope::Private, KnowledgeScope::Public];

    fn code(&self) -> &'static str {
        self.name()
    }

    fn name(&self) -> &'static str {
        match self {
            KnowledgeScope::Private => "private",
            KnowledgeScope::Public => "public",
        }
    }
}

pub const ANONYMOUS_AUTHOR: &str = "Anonymity";

/// An article stored in a contact's knowledge base
#[derive(Debug, Clone)]
pub struct KnowledgeArticle {
    base: EntityBase,
    pub contact_id: i64,
    /// Name of the knowledge base holding the article
    pub base_name: String,
    pub category: String,
    pub title: String,
    pub content: Option<String>,
    pub summarization: Option<String>,
    pub author: String,
    pub year: i32,
    pub month: i32,
    pub date: i32,
    pub scope: KnowledgeScope,
    pub activated: bool,
    pub num_segments: i32,
    pub num_words: i64,
}

impl KnowledgeArticle {
    pub fn new(
        base: EntityBase,
        contact_id: i64,
        base_name: impl Into<String>,
        category: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        Self {
            base,
            contact_id,
            base_name: base_name.into(),
            category: category.into(),
            title: title.into(),
            num_words: content.chars().count() as i64,
            content: Some(content),
            summarization: None,
            author: ANONYMOUS_AUTHOR.to_string(),
            year: 0,
            month: 0,
            date: 0,
            scope: KnowledgeScope::Private,
            activated: false,
            num_segments: 0,
        }
    }

    /// Builder: publication date
    pub fn with_date(mut self, year: i32, month: i32, date: i32) -> Self {
        self.year = year;
        self.month = month;
        self.date = date;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_scope(mut self, scope: KnowledgeScope) -> Self {
        self.scope = scope;
        self
    }

    /// Mark the article as segmented and searchable
    pub fn activate(&mut self, num_segments: i32) {
        self.activated = true;
        self.num_segments = num_segments;
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = self.base.to_object();
        object.insert("contactId".to_string(), Value::from(self.contact_id));
        object.insert("base".to_string(), Value::from(self.base_name.clone()));
        object.insert("category".to_string(), Value::from(self.category.clone()));
        object.insert("title".to_string(), Value::from(self.title.clone()));
        if !shape.is_compact() {
            object.insert(
                "content".to_string(),
                Value::from(self.content.clone().unwrap_or_default()),
            );
            object.insert(
                "summarization".to_string(),
                Value::from(self.summarization.clone().unwrap_or_default()),
            );
        }
        object.insert("author".to_string(), Value::from(self.author.clone()));
        object.insert("year".to_string(), Value::from(self.year));
        object.insert("month".to_string(), Value::from(self.month));
        object.insert("date".to_string(), Value::from(self.date));
        object.insert("scope".to_string(), Value::from(self.scope.name()));
        object.insert("activated".to_string(), Value::from(self.activated));
        object.insert("numSegments".to_string(), Value::from(self.num_segments));
        object.insert("numWords".to_string(), Value::from(self.num_words));
        Value::Object(object)
    }
}

impl Jsonable for KnowledgeArticle {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for KnowledgeArticle {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        let content = fields.opt_string("content")?;
        let num_words = match fields.opt_i64("numWords")? {
            Some(n) => n,
            None => content.as_deref().map_or(0, |c| c.chars().count() as i64),
        };

        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            contact_id: fields.i64("contactId")?,
            base_name: fields.string("base")?,
            category: fields.string("category")?,
            title: fields.string("title")?,
            content,
            summarization: fields.opt_string("summarization")?,
            author: fields
                .opt_string("author")?
                .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
            year: fields.i32("year")?,
            month: fields.i32("month")?,
            date: fields.i32("date")?,
            scope: fields
                .opt_string("scope")?
                .map_or(KnowledgeScope::FALLBACK, |s| KnowledgeScope::from_name(&s)),
            activated: fields.opt_bool("activated")?.unwrap_or(false),
            num_segments: fields.opt_i32("numSegments")?.unwrap_or(0),
            num_words,
        })
    }
}

shared::impl_entity!(KnowledgeArticle);
