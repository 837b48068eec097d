use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Assigned,
    Unassigned,
    All,
    Mentioned,
    TeamUnassigned,
    View,
}

impl ListType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Assigned => "assigned",
            ListType::Unassigned => "unassigned",
            ListType::All => "all",
            ListType::Mentioned => "mentioned",
            ListType::TeamUnassigned => "team_unassigned",
            ListType::View => "view",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "assigned" => Some(ListType::Assigned),
            "unassigned" => Some(ListType::Unassigned),
            "all" => Some(ListType::All),
            "mentioned" => Some(ListType::Mentioned),
            "team_unassigned" => Some(ListType::TeamUnassigned),
            "view" => Some(ListType::View),
            _ => None,
        }
    }

    /// Views are defined server-side and ignore ad hoc filters.
    pub fn accepts_filters(&self) -> bool {
        *self != ListType::View
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Oldest,
    #[default]
    Newest,
    StartedFirst,
    StartedLast,
    WaitingLongest,
    NextSlaTarget,
    PriorityFirst,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Oldest,
        SortField::Newest,
        SortField::StartedFirst,
        SortField::StartedLast,
        SortField::WaitingLongest,
        SortField::NextSlaTarget,
        SortField::PriorityFirst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Oldest => "oldest",
            SortField::Newest => "newest",
            SortField::StartedFirst => "started_first",
            SortField::StartedLast => "started_last",
            SortField::WaitingLongest => "waiting_longest",
            SortField::NextSlaTarget => "next_sla_target",
            SortField::PriorityFirst => "priority_first",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Oldest => "Oldest activity",
            SortField::Newest => "Newest activity",
            SortField::StartedFirst => "Started first",
            SortField::StartedLast => "Started last",
            SortField::WaitingLongest => "Waiting longest",
            SortField::NextSlaTarget => "Next SLA target",
            SortField::PriorityFirst => "Priority first",
        }
    }

    /// Column on the conversations model this field orders by.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Oldest | SortField::Newest => "last_message_at",
            SortField::StartedFirst | SortField::StartedLast => "created_at",
            SortField::WaitingLongest => "waiting_since",
            SortField::NextSlaTarget => "next_sla_deadline_at",
            SortField::PriorityFirst => "priority_id",
        }
    }

    pub fn order_by(&self) -> String {
        format!("conversations.{}", self.column())
    }

    pub fn order(&self) -> SortOrder {
        match self {
            SortField::Oldest
            | SortField::StartedFirst
            | SortField::WaitingLongest
            | SortField::NextSlaTarget => SortOrder::Asc,
            SortField::Newest | SortField::StartedLast | SortField::PriorityFirst => {
                SortOrder::Desc
            }
        }
    }
}

/// Which server-side collection backs the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListContext {
    pub list_type: ListType,
    pub team_id: Option<i64>,
    pub view_id: Option<i64>,
}

impl ListContext {
    pub fn new(list_type: ListType) -> Self {
        Self {
            list_type,
            team_id: None,
            view_id: None,
        }
    }

    pub fn team(team_id: i64) -> Self {
        Self {
            list_type: ListType::TeamUnassigned,
            team_id: Some(team_id),
            view_id: None,
        }
    }

    pub fn view(view_id: i64) -> Self {
        Self {
            list_type: ListType::View,
            team_id: None,
            view_id: Some(view_id),
        }
    }
}
