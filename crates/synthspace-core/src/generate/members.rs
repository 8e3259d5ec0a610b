use crate::{
    generate::{GenerateError, Generator},
    hook::FieldMap,
    model::{Channel, ChannelMember, RecordKind},
    types::{ChannelKind, RecordId},
};
use serde_json::json;

/// Direct messages hold two people when the pool allows it.
const IM_SIZE: u32 = 2;

/// Multi-party conversations need at least three people to be multi-party.
const MPIM_FLOOR: u32 = 3;

impl Generator<'_> {
    /// Synthesize memberships for every channel. With no users at all, every
    /// channel is simply empty. Sampling is without replacement from the
    /// full roster, so a pair can never repeat within one channel.
    pub fn channel_members(
        &mut self,
        workspace_id: &RecordId,
        channels: &[Channel],
        user_ids: &[RecordId],
    ) -> Result<Vec<ChannelMember>, GenerateError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let pool = u32::try_from(user_ids.len()).unwrap_or(u32::MAX);

        let mut members = Vec::new();
        for channel in channels {
            let picked = match channel.channel_type {
                ChannelKind::Im => {
                    let count = IM_SIZE.min(pool);
                    self.general.sample(user_ids, to_len(count))
                }
                ChannelKind::Mpim => self.mpim_sample(pool, user_ids),
                ChannelKind::Public | ChannelKind::Private => {
                    let max_c = self.config.channel_members_max.min(pool).max(1);
                    let min_c = self.config.channel_members_min.min(max_c).max(1);
                    let count = self.general.count_in(min_c, max_c);
                    self.general.sample(user_ids, to_len(count))
                }
            };

            for user_id in picked {
                let mut fields = FieldMap::new();
                fields.insert("channel_id".to_string(), json!(channel.id.as_str()));
                fields.insert("workspace_id".to_string(), json!(workspace_id.as_str()));
                fields.insert("user_id".to_string(), json!(user_id.as_str()));

                let fields = self.hooks.apply(RecordKind::ChannelMember, fields);
                members.push(ChannelMember::from_field_map(&fields)?);
            }
        }

        Ok(members)
    }

    /// Everyone joins when the pool cannot sustain a true multi-party group;
    /// that path consumes no draws, so mpim shapes replay stably.
    fn mpim_sample(&mut self, pool: u32, user_ids: &[RecordId]) -> Vec<RecordId> {
        let max_mpdm = self.config.mpdm_members_max.min(pool);
        if max_mpdm < MPIM_FLOOR {
            return user_ids.to_vec();
        }
        let low = self.config.mpdm_members_min.min(max_mpdm).max(MPIM_FLOOR);
        let count = self.general.count_in(low, max_mpdm);
        self.general.sample(user_ids, to_len(count))
    }
}

// usize is at least 32 bits on every supported target
#[allow(clippy::cast_possible_truncation)]
const fn to_len(count: u32) -> usize {
    count as usize
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use crate::{
        config::GenerationConfig,
        generate::Generator,
        hook::HookRegistry,
        model::{Channel, ChannelMember, User},
        types::ChannelKind,
    };
    use std::collections::{HashMap, HashSet};

    fn config(users: u32) -> GenerationConfig {
        GenerationConfig {
            users,
            channels: 6,
            dm_channels: 4,
            mpdm_channels: 3,
            messages: 0,
            files: 0,
            channel_members_min: 2,
            channel_members_max: 5,
            ..GenerationConfig::default()
        }
    }

    fn synthesize(users: u32) -> (Vec<Channel>, Vec<User>, Vec<ChannelMember>) {
        let hooks = HookRegistry::new();
        let mut generator = Generator::new(config(users), &hooks).expect("valid config");
        let workspace = generator.workspace().expect("workspace");
        let roster = generator.users(&workspace.id).expect("users");
        let channels = generator.channels(&workspace.id).expect("channels");
        let user_ids: Vec<_> = roster.iter().map(|u| u.id.clone()).collect();
        let members = generator
            .channel_members(&workspace.id, &channels, &user_ids)
            .expect("members");
        (channels, roster, members)
    }

    #[test]
    fn membership_counts_respect_per_kind_bounds() {
        let (channels, _, members) = synthesize(50);

        let mut by_channel: HashMap<_, u32> = HashMap::new();
        for member in &members {
            *by_channel.entry(member.channel_id.clone()).or_default() += 1;
        }

        for channel in &channels {
            let count = by_channel.get(&channel.id).copied().unwrap_or_default();
            match channel.channel_type {
                ChannelKind::Im => assert_eq!(count, 2),
                ChannelKind::Mpim => assert!((3..=7).contains(&count)),
                ChannelKind::Public | ChannelKind::Private => {
                    assert!((2..=5).contains(&count));
                }
            }
        }
    }

    #[test]
    fn member_pairs_are_unique_and_reference_the_roster() {
        let (channels, roster, members) = synthesize(50);

        let pairs: HashSet<_> = members
            .iter()
            .map(|m| (m.channel_id.clone(), m.user_id.clone()))
            .collect();
        assert_eq!(pairs.len(), members.len());

        let channel_ids: HashSet<_> = channels.iter().map(|c| c.id.clone()).collect();
        let user_ids: HashSet<_> = roster.iter().map(|u| u.id.clone()).collect();
        for member in &members {
            assert!(channel_ids.contains(&member.channel_id));
            assert!(user_ids.contains(&member.user_id));
        }
    }

    #[test]
    fn tiny_pools_fall_back_to_everyone() {
        let (channels, roster, members) = synthesize(2);

        let mut by_channel: HashMap<_, u32> = HashMap::new();
        for member in &members {
            *by_channel.entry(member.channel_id.clone()).or_default() += 1;
        }

        for channel in &channels {
            let count = by_channel.get(&channel.id).copied().unwrap_or_default();
            match channel.channel_type {
                // Pool of two cannot reach the multi-party floor.
                ChannelKind::Mpim => {
                    assert_eq!(count, u32::try_from(roster.len()).expect("small roster"));
                }
                ChannelKind::Im => assert_eq!(count, 2),
                ChannelKind::Public | ChannelKind::Private => {
                    assert!((1..=2).contains(&count));
                }
            }
        }
    }

    #[test]
    fn no_users_means_no_memberships() {
        let hooks = HookRegistry::new();
        let mut generator = Generator::new(
            GenerationConfig {
                users: 0,
                channels: 4,
                dm_channels: 0,
                mpdm_channels: 0,
                messages: 0,
                files: 0,
                ..GenerationConfig::default()
            },
            &hooks,
        )
        .expect("valid config");
        let workspace = generator.workspace().expect("workspace");
        let channels = generator.channels(&workspace.id).expect("channels");
        let members = generator
            .channel_members(&workspace.id, &channels, &[])
            .expect("members");
        assert!(members.is_empty());
    }
}
