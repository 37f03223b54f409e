//! Layer 11: Sample routing
//!
//! Maps a decoded registration sample onto the typed mutations: one identity
//! mutation, followed for the member `reg_*` commands by the matching
//! telemetry mutation; process samples route to their identity mutation
//! alone. The outcome carries the revision after the last mutation and the
//! events of all of them, in order.

use tracing::debug;

use super::db::RegistrationDb;
use super::domain::CmdType;
use super::event::ApplyOutcome;
use super::sample::{Sample, SamplePayload};

impl RegistrationDb {
    /// Apply one sample. Unknown commands, data-plane commands, and payloads
    /// that do not match their command are ignorable by design: they return
    /// the current revision and no events.
    pub fn apply_sample(&self, sample: &Sample) -> ApplyOutcome {
        let key = sample.identifier.entity_id;
        let process_key = sample.identifier.process_id;

        match (sample.cmd_type, &sample.payload) {
            // Processes are the one kind whose sample carries no telemetry
            // follow-up; run state reaches the telemetry table only through
            // the direct mutation.
            (CmdType::RegProcess, SamplePayload::Process(process)) => {
                self.add_or_update_process(process_key, process.identity(&sample.identifier))
            }
            (CmdType::UnregProcess, _) => self.remove_process(process_key),
            (CmdType::RegPublisher, SamplePayload::Topic(topic)) => {
                let mut outcome =
                    self.add_or_update_publisher(key, topic.identity(&sample.identifier));
                let followup = self.update_publisher_telemetry(key, topic.telemetry());
                outcome.revision = followup.revision;
                outcome
            }
            (CmdType::UnregPublisher, _) => self.remove_publisher(key),
            (CmdType::RegSubscriber, SamplePayload::Topic(topic)) => {
                let mut outcome =
                    self.add_or_update_subscriber(key, topic.identity(&sample.identifier));
                let followup = self.update_subscriber_telemetry(key, topic.telemetry());
                outcome.revision = followup.revision;
                outcome
            }
            (CmdType::UnregSubscriber, _) => self.remove_subscriber(key),
            (CmdType::RegService, SamplePayload::Service(service)) => {
                let mut outcome =
                    self.add_or_update_server(key, service.identity(&sample.identifier));
                let followup = self.update_server_telemetry(key, service.telemetry());
                outcome.revision = followup.revision;
                outcome
            }
            (CmdType::UnregService, _) => self.remove_server(key),
            (CmdType::RegClient, SamplePayload::Client(client)) => {
                let mut outcome =
                    self.add_or_update_client(key, client.identity(&sample.identifier));
                let followup = self.update_client_telemetry(key, client.telemetry());
                outcome.revision = followup.revision;
                outcome
            }
            (CmdType::UnregClient, _) => self.remove_client(key),
            // None, SetSample, and command/payload mismatches.
            _ => ApplyOutcome::unchanged(self.current_revision()),
        }
    }

    /// Fold [`apply_sample`](Self::apply_sample) over a batch. Each sample is
    /// atomic; the batch as a whole is not.
    pub fn apply_samples<'a, I>(&self, samples: I) -> ApplyOutcome
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        let mut outcome = ApplyOutcome::unchanged(self.current_revision());
        let mut count = 0usize;
        for sample in samples {
            let single = self.apply_sample(sample);
            outcome.revision = single.revision;
            outcome.events.extend(single.events);
            count += 1;
        }
        debug!(
            samples = count,
            revision = %outcome.revision,
            events = outcome.events.len(),
            "sample batch applied"
        );
        outcome
    }
}
