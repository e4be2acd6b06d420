//! cube enums command

use aigc::{Expression, HandKeypoint, Handedness, KnowledgeScope, PoseKeypoint, Sentiment, SpeechEmotion};
use clap::{Args, ValueEnum};
use contact::{
    ContactZoneAction, ContactZoneParticipantState, ContactZoneParticipantType, ContactZoneState,
    GroupState,
};
use resource::Subject;
use shared::WireEnum;

/// Enumerations with a printable wire table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnumName {
    GroupState,
    ZoneState,
    ParticipantType,
    ParticipantState,
    ZoneAction,
    Subject,
    Expression,
    HandKeypoint,
    PoseKeypoint,
    Handedness,
    Sentiment,
    SpeechEmotion,
    KnowledgeScope,
}

/// One row of a wire table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRow {
    pub code: String,
    pub name: &'static str,
    pub fallback: bool,
}

impl EnumName {
    pub fn rows(&self) -> Vec<WireRow> {
        match self {
            EnumName::GroupState => wire_rows::<GroupState>(),
            EnumName::ZoneState => wire_rows::<ContactZoneState>(),
            EnumName::ParticipantType => wire_rows::<ContactZoneParticipantType>(),
            EnumName::ParticipantState => wire_rows::<ContactZoneParticipantState>(),
            EnumName::ZoneAction => ContactZoneAction::ALL
                .iter()
                .map(|a| WireRow {
                    code: a.code().to_string(),
                    name: a.name(),
                    fallback: false,
                })
                .collect(),
            EnumName::Subject => Subject::ALL
                .iter()
                .map(|s| WireRow {
                    code: s.name().to_string(),
                    name: s.name(),
                    fallback: false,
                })
                .collect(),
            EnumName::Expression => wire_rows::<Expression>(),
            EnumName::HandKeypoint => wire_rows::<HandKeypoint>(),
            EnumName::PoseKeypoint => wire_rows::<PoseKeypoint>(),
            EnumName::Handedness => wire_rows::<Handedness>(),
            EnumName::Sentiment => wire_rows::<Sentiment>(),
            EnumName::SpeechEmotion => wire_rows::<SpeechEmotion>(),
            EnumName::KnowledgeScope => wire_rows::<KnowledgeScope>(),
        }
    }
}

fn wire_rows<E: WireEnum>() -> Vec<WireRow> {
    E::ALL
        .iter()
        .map(|v| WireRow {
            code: format!("{:?}", v.code()).trim_matches('"').to_string(),
            name: v.name(),
            fallback: v.is_fallback(),
        })
        .collect()
}

#[derive(Debug, Args)]
pub struct EnumsCommand {
    /// Enumeration to print
    #[arg(value_enum)]
    pub name: EnumName,
}

impl EnumsCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        for row in self.name.rows() {
            let marker = if row.fallback { " (fallback)" } else { "" };
            println!("{:>6}  {}{}", row.code, row.name, marker);
        }
        Ok(())
    }
}
