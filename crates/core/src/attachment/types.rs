//! Attachment types.

use serde::{Deserialize, Serialize};

use crate::clients::AvStatus;

/// Attachment types valid on a CVL case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentType {
    /// The winding-up resolution document.
    Resolution,
    /// Statement of affairs sworn by a director.
    StatementOfAffairsDirector,
    /// Statement of affairs lodged by the liquidator.
    StatementOfAffairsLiquidator,
    /// Statement of concurrence accompanying a statement of affairs.
    StatementOfConcurrence,
    /// Progress report document.
    ProgressReport,
}

impl AttachmentType {
    /// Wire form of the attachment type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolution => "resolution",
            Self::StatementOfAffairsDirector => "statement-of-affairs-director",
            Self::StatementOfAffairsLiquidator => "statement-of-affairs-liquidator",
            Self::StatementOfConcurrence => "statement-of-concurrence",
            Self::ProgressReport => "progress-report",
        }
    }

    /// Parses the wire form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resolution" => Some(Self::Resolution),
            "statement-of-affairs-director" => Some(Self::StatementOfAffairsDirector),
            "statement-of-affairs-liquidator" => Some(Self::StatementOfAffairsLiquidator),
            "statement-of-concurrence" => Some(Self::StatementOfConcurrence),
            "progress-report" => Some(Self::ProgressReport),
            _ => None,
        }
    }

    /// True for types a case can carry at most one of.
    #[must_use]
    pub const fn is_unique_per_case(self) -> bool {
        !matches!(self, Self::StatementOfConcurrence)
    }

    /// True for the statement-of-affairs statement types (director or
    /// liquidator).
    #[must_use]
    pub const fn is_statement(self) -> bool {
        matches!(
            self,
            Self::StatementOfAffairsDirector | Self::StatementOfAffairsLiquidator
        )
    }
}

/// Lifecycle of an attachment in the case store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentStatus {
    /// Uploaded, scan not yet reported.
    Submitted,
    /// Scan in progress.
    Processing,
    /// Scan passed; downloadable.
    Clean,
    /// Scan failed; never served.
    Infected,
    /// Removed from the file service.
    Deleted,
}

impl AttachmentStatus {
    /// Wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Processing => "processing",
            Self::Clean => "clean",
            Self::Infected => "infected",
            Self::Deleted => "deleted",
        }
    }

    /// Parses the wire form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(Self::Submitted),
            "processing" => Some(Self::Processing),
            "clean" => Some(Self::Clean),
            "infected" => Some(Self::Infected),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    /// The store status implied by a file-service scan state.
    #[must_use]
    pub const fn from_av(av: AvStatus) -> Self {
        match av {
            AvStatus::NotScanned => Self::Processing,
            AvStatus::Clean => Self::Clean,
            AvStatus::Infected => Self::Infected,
        }
    }
}

/// Links carried by an attachment resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentLinks {
    /// The attachment metadata.
    #[serde(rename = "self")]
    pub this: String,
    /// The attachment bytes, gated on a clean scan.
    pub download: String,
}

/// Attachment metadata as stored on the case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment id; equal to the file-service id.
    pub id: String,
    /// Attachment type.
    #[serde(rename = "type")]
    pub attachment_type: AttachmentType,
    /// Lifecycle status.
    pub status: AttachmentStatus,
    /// Attachment links.
    pub links: AttachmentLinks,
}

/// The joined metadata view: store row plus file-service detail.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentDetails {
    /// Attachment id.
    pub id: String,
    /// Attachment type.
    #[serde(rename = "type")]
    pub attachment_type: AttachmentType,
    /// Lifecycle status.
    pub status: AttachmentStatus,
    /// Original filename.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub content_type: String,
    /// Attachment links.
    pub links: AttachmentLinks,
}
