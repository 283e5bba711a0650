//! Internal social network models: members, posts and groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{ymd, Record};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(with = "crate::store::date")]
    pub joined_at: DateTime<Utc>,
}

impl Record for Member {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.department.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    #[serde(with = "crate::store::date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    /// Posted to a group; `None` for the company-wide feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Ids of members who liked the post
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(with = "crate::store::date")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn is_liked_by(&self, member_id: &str) -> bool {
        self.likes.iter().any(|id| id == member_id)
    }

    /// Add or remove `member_id`'s like. Returns whether the post is now liked.
    pub fn toggle_like(&mut self, member_id: &str) -> bool {
        if self.is_liked_by(member_id) {
            self.likes.retain(|id| id != member_id);
            false
        } else {
            self.likes.push(member_id.to_string());
            true
        }
    }
}

impl Record for Post {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.author_name.as_str(), self.content.as_str()]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
    pub created_by: String,
    #[serde(with = "crate::store::date")]
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn has_member(&self, member_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == member_id)
    }

    /// Remove `member_id`. Returns `false` if it was not a member.
    pub fn remove_member(&mut self, member_id: &str) -> bool {
        let before = self.member_ids.len();
        self.member_ids.retain(|id| id != member_id);
        self.member_ids.len() != before
    }
}

impl Record for Group {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

pub fn sample_members() -> Vec<Member> {
    let member = |id: &str, name: &str, email: &str, department: &str, role: &str, joined| Member {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        department: department.into(),
        role: role.into(),
        bio: None,
        joined_at: joined,
    };

    vec![
        Member {
            bio: Some("Responsable des ressources humaines".into()),
            ..member("1", "Sofia Meziane", "sofia@entreprise.dz", "RH", "Manager", ymd(2022, 5, 2))
        },
        member("2", "Karim Ouali", "karim@entreprise.dz", "Informatique", "Développeur", ymd(2023, 2, 13)),
        member("3", "Lina Brahimi", "lina@entreprise.dz", "Marketing", "Chargée de communication", ymd(2023, 9, 4)),
    ]
}

pub fn sample_groups() -> Vec<Group> {
    vec![
        Group {
            id: "1".into(),
            name: "Équipe Tech".into(),
            description: "Discussions techniques et partage de veille".into(),
            member_ids: vec!["2".into()],
            created_by: "2".into(),
            created_at: ymd(2023, 3, 1),
        },
        Group {
            id: "2".into(),
            name: "Événements".into(),
            description: "Organisation des sorties et événements internes".into(),
            member_ids: vec!["1".into(), "2".into(), "3".into()],
            created_by: "1".into(),
            created_at: ymd(2023, 6, 20),
        },
    ]
}

pub fn sample_posts(now: DateTime<Utc>) -> Vec<Post> {
    vec![
        Post {
            id: "1".into(),
            author_id: "1".into(),
            author_name: "Sofia Meziane".into(),
            content: "Bienvenue à nos nouveaux collaborateurs du mois !".into(),
            group_id: None,
            likes: vec!["2".into(), "3".into()],
            comments: vec![Comment {
                id: "1".into(),
                author_id: "3".into(),
                author_name: "Lina Brahimi".into(),
                content: "Bienvenue à tous !".into(),
                created_at: ymd(2024, 1, 8),
            }],
            created_at: ymd(2024, 1, 8),
        },
        Post {
            id: "2".into(),
            author_id: "2".into(),
            author_name: "Karim Ouali".into(),
            content: "Migration des serveurs prévue ce week-end.".into(),
            group_id: Some("1".into()),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_like() {
        let mut post = sample_posts(ymd(2024, 2, 1)).remove(1);
        assert!(post.toggle_like("3"));
        assert!(post.is_liked_by("3"));
        assert!(!post.toggle_like("3"));
        assert!(post.likes.is_empty());
    }

    #[test]
    fn test_remove_member() {
        let mut group = sample_groups().remove(1);
        assert!(group.remove_member("2"));
        assert!(!group.remove_member("2"));
        assert_eq!(group.member_ids, vec!["1", "3"]);
    }
}
