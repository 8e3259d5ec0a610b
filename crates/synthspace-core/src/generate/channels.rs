use crate::{
    generate::{GenerateError, Generator},
    hook::FieldMap,
    model::{Channel, RecordKind},
    rng::StreamKind,
    types::{ChannelKind, RecordId},
};
use serde_json::json;

/// Probability that an ordinary channel is private.
const PRIVATE_RATE: f64 = 0.15;

/// Topic word count for ordinary channels.
const TOPIC_WORDS: usize = 6;

impl Generator<'_> {
    /// Synthesize ordinary, then im, then mpim channels.
    ///
    /// All three phases draw from the single channels identity stream in
    /// that order, so the id sequence is a function of the total shape, not
    /// of any one phase's count.
    pub fn channels(&mut self, workspace_id: &RecordId) -> Result<Vec<Channel>, GenerateError> {
        let total = self
            .config
            .channels
            .saturating_add(self.config.dm_channels)
            .saturating_add(self.config.mpdm_channels);
        let mut ids = self.id_stream(StreamKind::Channels, workspace_id);
        let mut channels = Vec::with_capacity(usize::try_from(total).unwrap_or(usize::MAX));

        for index in 0..self.config.channels {
            let id = RecordId::draw(&mut ids);
            let base = self.lexicon.word().replace('_', "-");
            let name = if index == 0 {
                base
            } else {
                format!("{base}-{index}")
            };
            let kind = if self.general.chance(PRIVATE_RATE) {
                ChannelKind::Private
            } else {
                ChannelKind::Public
            };
            let topic = self.lexicon.sentence(TOPIC_WORDS);
            channels.push(self.finish_channel(workspace_id, &id, &name, kind, &topic)?);
        }

        for index in 0..self.config.dm_channels {
            let id = RecordId::draw(&mut ids);
            let name = format!("dm-{:04}", index + 1);
            channels.push(self.finish_channel(
                workspace_id,
                &id,
                &name,
                ChannelKind::Im,
                "Direct message",
            )?);
        }

        for index in 0..self.config.mpdm_channels {
            let id = RecordId::draw(&mut ids);
            let name = format!("mpdm-{:04}", index + 1);
            channels.push(self.finish_channel(
                workspace_id,
                &id,
                &name,
                ChannelKind::Mpim,
                "Multi-party direct message",
            )?);
        }

        Ok(channels)
    }

    fn finish_channel(
        &self,
        workspace_id: &RecordId,
        id: &RecordId,
        name: &str,
        kind: ChannelKind,
        topic: &str,
    ) -> Result<Channel, GenerateError> {
        let mut fields = FieldMap::new();
        fields.insert("id".to_string(), json!(id.as_str()));
        fields.insert("workspace_id".to_string(), json!(workspace_id.as_str()));
        fields.insert("name".to_string(), json!(name));
        fields.insert("is_private".to_string(), json!(kind.is_private()));
        fields.insert("channel_type".to_string(), json!(kind.as_str()));
        fields.insert("topic".to_string(), json!(topic));

        let fields = self.hooks.apply(RecordKind::Channel, fields);
        Ok(Channel::from_field_map(&fields)?)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use crate::{
        config::GenerationConfig, generate::Generator, hook::HookRegistry, types::ChannelKind,
    };
    use std::collections::HashSet;

    fn config() -> GenerationConfig {
        GenerationConfig {
            users: 10,
            channels: 12,
            dm_channels: 3,
            mpdm_channels: 2,
            messages: 0,
            files: 0,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn phases_emit_in_order_with_unique_ids() {
        let hooks = HookRegistry::new();
        let mut generator = Generator::new(config(), &hooks).expect("valid config");
        let workspace = generator.workspace().expect("workspace");
        let channels = generator.channels(&workspace.id).expect("channels");

        assert_eq!(channels.len(), 17);
        let ids: HashSet<_> = channels.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), channels.len());

        assert!(
            channels[..12]
                .iter()
                .all(|c| matches!(c.channel_type, ChannelKind::Public | ChannelKind::Private))
        );
        assert!(channels[12..15].iter().all(|c| c.channel_type == ChannelKind::Im));
        assert!(channels[15..].iter().all(|c| c.channel_type == ChannelKind::Mpim));
    }

    #[test]
    fn direct_channels_are_named_ordinally_and_locked_private() {
        let hooks = HookRegistry::new();
        let mut generator = Generator::new(config(), &hooks).expect("valid config");
        let workspace = generator.workspace().expect("workspace");
        let channels = generator.channels(&workspace.id).expect("channels");

        assert_eq!(channels[12].name, "dm-0001");
        assert_eq!(channels[12].topic, "Direct message");
        assert_eq!(channels[15].name, "mpdm-0001");
        assert_eq!(channels[15].topic, "Multi-party direct message");
        assert!(channels[12..].iter().all(|c| c.is_private));
    }

    #[test]
    fn ordinary_channel_privacy_matches_its_type() {
        let hooks = HookRegistry::new();
        let mut generator = Generator::new(config(), &hooks).expect("valid config");
        let workspace = generator.workspace().expect("workspace");
        let channels = generator.channels(&workspace.id).expect("channels");

        for channel in &channels[..12] {
            assert_eq!(channel.is_private, channel.channel_type.is_private());
        }
    }

    #[test]
    fn first_ordinary_channel_has_no_index_suffix() {
        let hooks = HookRegistry::new();
        let mut generator = Generator::new(config(), &hooks).expect("valid config");
        let workspace = generator.workspace().expect("workspace");
        let channels = generator.channels(&workspace.id).expect("channels");

        assert!(!channels[0].name.ends_with("-0"));
        for (index, channel) in channels[..12].iter().enumerate().skip(1) {
            assert!(channel.name.ends_with(&format!("-{index}")));
        }
    }
}
