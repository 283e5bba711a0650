//! Internal social network: members, a post feed with likes and comments, and
//! groups.
//!
//! | action          | cascade                                               |
//! |-----------------|-------------------------------------------------------|
//! | delete member   | removed from every group and every like list          |
//! | delete group    | its posts move to the general feed                    |
//! | rename member   | author name updated on their posts                    |

use chrono::Utc;

use super::{open_store, require, DashboardError, DashboardResult};
use crate::config::DashkitConfig;
use crate::form::{non_empty, Draft, FormEditor, FormError, Submission};
use crate::models::social::{
    sample_groups, sample_members, sample_posts, Comment, Group, Member, Post,
};
use crate::store::{KeyValueStore, RecordStore, StoreContext, StoreResult};
use crate::view::{Tab, ViewState};

pub const MEMBERS_KEY: &str = "social-members";
pub const POSTS_KEY: &str = "social-posts";
pub const GROUPS_KEY: &str = "social-groups";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SocialTab {
    #[default]
    Feed,
    Members,
    Groups,
}

impl Tab for SocialTab {
    const ALL: &'static [Self] = &[SocialTab::Feed, SocialTab::Members, SocialTab::Groups];

    fn label(&self) -> &'static str {
        match self {
            SocialTab::Feed => "Fil d'actualité",
            SocialTab::Members => "Membres",
            SocialTab::Groups => "Groupes",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberDraft {
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub bio: String,
}

impl Draft for MemberDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("department", self.department.as_str()),
        ]
    }
}

impl From<&Member> for MemberDraft {
    fn from(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            email: member.email.clone(),
            department: member.department.clone(),
            role: member.role.clone(),
            bio: member.bio.clone().unwrap_or_default(),
        }
    }
}

/// Post composer. An empty group id posts to the general feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub author_id: String,
    pub content: String,
    pub group_id: String,
}

impl Draft for PostDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("authorId", self.author_id.as_str()),
            ("content", self.content.as_str()),
        ]
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            author_id: post.author_id.clone(),
            content: post.content.clone(),
            group_id: post.group_id.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupDraft {
    pub name: String,
    pub description: String,
    pub created_by: String,
}

impl Draft for GroupDraft {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("createdBy", self.created_by.as_str()),
        ]
    }
}

impl From<&Group> for GroupDraft {
    fn from(group: &Group) -> Self {
        Self {
            name: group.name.clone(),
            description: group.description.clone(),
            created_by: group.created_by.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialStats {
    pub members: usize,
    pub posts: usize,
    pub groups: usize,
    pub likes: usize,
    pub comments: usize,
}

pub struct SocialDashboard<S> {
    ctx: StoreContext<S>,
    members: RecordStore<Member>,
    posts: RecordStore<Post>,
    groups: RecordStore<Group>,
    pub view: ViewState<SocialTab>,
    pub member_form: FormEditor<MemberDraft>,
    pub post_form: FormEditor<PostDraft>,
    pub group_form: FormEditor<GroupDraft>,
}

impl<S: KeyValueStore> SocialDashboard<S> {
    pub fn open(backend: S, config: &DashkitConfig) -> DashboardResult<Self> {
        let ctx = StoreContext::from_config(backend, &config.records);
        let seed = config.records.seed_samples;
        let now = Utc::now();

        let members = open_store(&ctx, MEMBERS_KEY, seed, sample_members)?;
        let posts = open_store(&ctx, POSTS_KEY, seed, || sample_posts(now))?;
        let groups = open_store(&ctx, GROUPS_KEY, seed, sample_groups)?;

        Ok(Self {
            ctx,
            members,
            posts,
            groups,
            view: ViewState::new(),
            member_form: FormEditor::new(),
            post_form: FormEditor::new(),
            group_form: FormEditor::new(),
        })
    }

    pub fn members(&self) -> &RecordStore<Member> {
        &self.members
    }

    pub fn posts(&self) -> &RecordStore<Post> {
        &self.posts
    }

    pub fn groups(&self) -> &RecordStore<Group> {
        &self.groups
    }

    pub fn reload(&mut self) -> StoreResult<()> {
        self.members.reload(&self.ctx)?;
        self.posts.reload(&self.ctx)?;
        self.groups.reload(&self.ctx)
    }

    // -- Members --

    pub fn edit_member(&mut self, id: &str) -> bool {
        match self.members.get(id) {
            Some(member) => {
                self.member_form.open_edit(id, MemberDraft::from(member));
                true
            }
            None => false,
        }
    }

    pub fn submit_member(&mut self) -> DashboardResult<Option<Member>> {
        let submission = self.member_form.submit()?;
        let result = self.commit_member(submission.clone());
        if result.is_err() {
            self.member_form.restore(submission);
        }
        result
    }

    pub fn commit_member(
        &mut self,
        submission: Submission<MemberDraft>,
    ) -> DashboardResult<Option<Member>> {
        let draft = submission.draft();
        draft.validate()?;

        match &submission {
            Submission::Create(draft) => {
                let member = Member {
                    id: String::new(),
                    name: draft.name.trim().to_string(),
                    email: draft.email.trim().to_string(),
                    department: draft.department.trim().to_string(),
                    role: draft.role.trim().to_string(),
                    bio: non_empty(&draft.bio),
                    joined_at: Utc::now(),
                };
                let member = self.members.create(&self.ctx, member)?;
                tracing::info!(id = %member.id, "Created member");
                Ok(Some(member))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.members.get(id) else {
                    return Ok(None);
                };
                let updated = Member {
                    name: draft.name.trim().to_string(),
                    email: draft.email.trim().to_string(),
                    department: draft.department.trim().to_string(),
                    role: draft.role.trim().to_string(),
                    bio: non_empty(&draft.bio),
                    ..existing.clone()
                };
                self.members.update(&self.ctx, id, updated.clone())?;
                self.posts.modify_where(
                    &self.ctx,
                    |p| p.author_id == updated.id,
                    |p| p.author_name = updated.name.clone(),
                )?;
                Ok(Some(updated))
            }
        }
    }

    pub fn delete_member(&mut self, id: &str) -> DashboardResult<bool> {
        if self.members.delete(&self.ctx, id)?.is_none() {
            return Ok(false);
        }
        let left = self.groups.modify_where(
            &self.ctx,
            |g| g.has_member(id),
            |g| {
                g.remove_member(id);
            },
        )?;
        self.posts.modify_where(
            &self.ctx,
            |p| p.is_liked_by(id),
            |p| p.likes.retain(|liker| liker != id),
        )?;
        tracing::info!(id, groups_left = left, "Deleted member");
        Ok(true)
    }

    pub fn search_members(&self, query: &str) -> Vec<&Member> {
        self.members.search(query)
    }

    // -- Posts --

    pub fn edit_post(&mut self, id: &str) -> bool {
        match self.posts.get(id) {
            Some(post) => {
                self.post_form.open_edit(id, PostDraft::from(post));
                true
            }
            None => false,
        }
    }

    pub fn submit_post(&mut self) -> DashboardResult<Option<Post>> {
        let submission = self.post_form.submit()?;
        let result = self.commit_post(submission.clone());
        if result.is_err() {
            self.post_form.restore(submission);
        }
        result
    }

    /// Publish or edit a post. Posting into a group requires membership.
    /// Edits change content and group only; likes and comments stay.
    pub fn commit_post(&mut self, submission: Submission<PostDraft>) -> DashboardResult<Option<Post>> {
        let draft = submission.draft();
        draft.validate()?;
        let author = require(&self.members, "authorId", draft.author_id.trim())?;
        let group_id = match non_empty(&draft.group_id) {
            Some(group_id) => {
                let group = require(&self.groups, "groupId", &group_id)?;
                if !group.has_member(&author.id) {
                    return Err(DashboardError::NotGroupMember {
                        group_id,
                        member_id: author.id.clone(),
                    });
                }
                Some(group_id)
            }
            None => None,
        };

        match &submission {
            Submission::Create(draft) => {
                let post = Post {
                    id: String::new(),
                    author_id: author.id.clone(),
                    author_name: author.name.clone(),
                    content: draft.content.trim().to_string(),
                    group_id,
                    likes: Vec::new(),
                    comments: Vec::new(),
                    created_at: Utc::now(),
                };
                let post = self.posts.create(&self.ctx, post)?;
                tracing::info!(id = %post.id, author = %post.author_id, "Published post");
                Ok(Some(post))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.posts.get(id) else {
                    return Ok(None);
                };
                let updated = Post {
                    content: draft.content.trim().to_string(),
                    group_id,
                    ..existing.clone()
                };
                self.posts.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    pub fn delete_post(&mut self, id: &str) -> DashboardResult<bool> {
        Ok(self.posts.delete(&self.ctx, id)?.is_some())
    }

    /// All posts, newest first. Posts with the same timestamp show the most
    /// recently added first.
    pub fn feed(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.list().iter().rev().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    pub fn group_feed(&self, group_id: &str) -> Vec<&Post> {
        self.feed()
            .into_iter()
            .filter(|p| p.group_id.as_deref() == Some(group_id))
            .collect()
    }

    /// Like or unlike. Returns whether the post is now liked, `None` when
    /// the post is unknown.
    pub fn toggle_like(&mut self, post_id: &str, member_id: &str) -> DashboardResult<Option<bool>> {
        require(&self.members, "memberId", member_id)?;
        let mut liked = None;
        self.posts.modify(&self.ctx, post_id, |p| {
            liked = Some(p.toggle_like(member_id));
        })?;
        Ok(liked)
    }

    /// Append a comment. Returns the comment, `None` when the post is
    /// unknown.
    pub fn add_comment(
        &mut self,
        post_id: &str,
        author_id: &str,
        content: &str,
    ) -> DashboardResult<Option<Comment>> {
        let content = non_empty(content).ok_or(FormError::MissingField("content"))?;
        let author = require(&self.members, "authorId", author_id)?;
        let comment = Comment {
            id: self.ctx.next_id(),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            content,
            created_at: Utc::now(),
        };

        let added = self
            .posts
            .modify(&self.ctx, post_id, |p| p.comments.push(comment.clone()))?;
        Ok(added.then_some(comment))
    }

    pub fn delete_comment(&mut self, post_id: &str, comment_id: &str) -> DashboardResult<bool> {
        let mut removed = false;
        self.posts.modify(&self.ctx, post_id, |p| {
            let before = p.comments.len();
            p.comments.retain(|c| c.id != comment_id);
            removed = p.comments.len() != before;
        })?;
        Ok(removed)
    }

    pub fn search_posts(&self, query: &str) -> Vec<&Post> {
        self.posts.search(query)
    }

    // -- Groups --

    pub fn edit_group(&mut self, id: &str) -> bool {
        match self.groups.get(id) {
            Some(group) => {
                self.group_form.open_edit(id, GroupDraft::from(group));
                true
            }
            None => false,
        }
    }

    pub fn submit_group(&mut self) -> DashboardResult<Option<Group>> {
        let submission = self.group_form.submit()?;
        let result = self.commit_group(submission.clone());
        if result.is_err() {
            self.group_form.restore(submission);
        }
        result
    }

    /// Create a group (its creator joins it) or rename/redescribe one.
    pub fn commit_group(&mut self, submission: Submission<GroupDraft>) -> DashboardResult<Option<Group>> {
        let draft = submission.draft();
        draft.validate()?;

        match &submission {
            Submission::Create(draft) => {
                let creator = require(&self.members, "createdBy", draft.created_by.trim())?;
                let group = Group {
                    id: String::new(),
                    name: draft.name.trim().to_string(),
                    description: draft.description.trim().to_string(),
                    member_ids: vec![creator.id.clone()],
                    created_by: creator.id.clone(),
                    created_at: Utc::now(),
                };
                let group = self.groups.create(&self.ctx, group)?;
                tracing::info!(id = %group.id, "Created group");
                Ok(Some(group))
            }
            Submission::Update { id, draft } => {
                let Some(existing) = self.groups.get(id) else {
                    return Ok(None);
                };
                let updated = Group {
                    name: draft.name.trim().to_string(),
                    description: draft.description.trim().to_string(),
                    ..existing.clone()
                };
                self.groups.update(&self.ctx, id, updated.clone())?;
                Ok(Some(updated))
            }
        }
    }

    /// Add a member to a group. False when the group is unknown or the
    /// member already belongs to it.
    pub fn join_group(&mut self, group_id: &str, member_id: &str) -> DashboardResult<bool> {
        require(&self.members, "memberId", member_id)?;
        let Some(group) = self.groups.get(group_id) else {
            return Ok(false);
        };
        if group.has_member(member_id) {
            return Ok(false);
        }
        Ok(self.groups.modify(&self.ctx, group_id, |g| {
            g.member_ids.push(member_id.to_string());
        })?)
    }

    pub fn leave_group(&mut self, group_id: &str, member_id: &str) -> DashboardResult<bool> {
        let mut left = false;
        self.groups.modify(&self.ctx, group_id, |g| {
            left = g.remove_member(member_id);
        })?;
        Ok(left)
    }

    /// Groups `member_id` belongs to.
    pub fn member_groups(&self, member_id: &str) -> Vec<&Group> {
        self.groups.filter(|g| g.has_member(member_id))
    }

    pub fn delete_group(&mut self, id: &str) -> DashboardResult<bool> {
        if self.groups.delete(&self.ctx, id)?.is_none() {
            return Ok(false);
        }
        let moved = self.posts.modify_where(
            &self.ctx,
            |p| p.group_id.as_deref() == Some(id),
            |p| p.group_id = None,
        )?;
        tracing::info!(id, moved, "Deleted group");
        Ok(true)
    }

    pub fn search_groups(&self, query: &str) -> Vec<&Group> {
        self.groups.search(query)
    }

    // -- Dashboard --

    pub fn stats(&self) -> SocialStats {
        let posts = self.posts.list();
        SocialStats {
            members: self.members.len(),
            posts: posts.len(),
            groups: self.groups.len(),
            likes: posts.iter().map(|p| p.likes.len()).sum(),
            comments: posts.iter().map(|p| p.comments.len()).sum(),
        }
    }
}
