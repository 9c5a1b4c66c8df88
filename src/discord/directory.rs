use crate::core::commands::{DirectoryError, MemberDirectory, MemberProfile};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Member lookups backed by the serenity cache, falling back to HTTP.
pub struct SerenityDirectory {
    cache: Arc<serenity::Cache>,
    http: Arc<serenity::Http>,
}

impl SerenityDirectory {
    pub fn new(cache: Arc<serenity::Cache>, http: Arc<serenity::Http>) -> Self {
        Self { cache, http }
    }
}

fn profile_of(member: &serenity::Member) -> MemberProfile {
    MemberProfile {
        member_id: member.user.id.get(),
        // display_name() prefers nick over username
        display_name: member.display_name().to_string(),
        avatar_url: Some(member.face()),
    }
}

#[async_trait]
impl MemberDirectory for SerenityDirectory {
    async fn member_profile(
        &self,
        community_id: u64,
        member_id: u64,
    ) -> Result<Option<MemberProfile>, DirectoryError> {
        if community_id == 0 || member_id == 0 {
            return Ok(None);
        }
        let guild_id = serenity::GuildId::new(community_id);
        let user_id = serenity::UserId::new(member_id);

        let cached = self
            .cache
            .guild(guild_id)
            .and_then(|guild| guild.members.get(&user_id).map(profile_of));
        if cached.is_some() {
            return Ok(cached);
        }

        match self.http.get_member(guild_id, user_id).await {
            Ok(member) => Ok(Some(profile_of(&member))),
            // Unknown member: they left the guild
            Err(serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response)))
                if response.status_code.as_u16() == 404 =>
            {
                Ok(None)
            }
            Err(e) => Err(DirectoryError::Lookup(e.to_string())),
        }
    }

    fn community_count(&self) -> usize {
        self.cache.guild_count()
    }
}
