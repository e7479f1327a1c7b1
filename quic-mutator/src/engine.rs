// quic-mutator/src/engine.rs
//! Applies a validated mutation list to a hello message in place.

use crate::descriptor::{MutationAction, MutationList};
use crate::hello::{ClientHello, HelloFields, ServerHello};
use crate::sink::{AdditionalPacket, DropSink, PacketSink};
use log::{debug, trace};

/// Mutation engine. `S` receives `send_additional_packet` requests.
#[derive(Debug, Default)]
pub struct Engine<S = DropSink> {
    sink: S,
}

impl Engine<DropSink> {
    pub fn new() -> Self {
        Self { sink: DropSink }
    }
}

impl<S: PacketSink> Engine<S> {
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn apply_to_client<'m>(
        &mut self,
        message: &'m mut ClientHello,
        mutations: &MutationList,
    ) -> &'m mut ClientHello {
        self.apply(message, mutations)
    }

    pub fn apply_to_server<'m>(
        &mut self,
        message: &'m mut ServerHello,
        mutations: &MutationList,
    ) -> &'m mut ServerHello {
        self.apply(message, mutations)
    }

    /// Apply every descriptor aimed at `M::ROLE`, in list order.
    ///
    /// Descriptors for the other role are skipped, as are field mutations
    /// naming a field the shape does not expose.
    pub fn apply<'m, M: HelloFields>(
        &mut self,
        message: &'m mut M,
        mutations: &MutationList,
    ) -> &'m mut M {
        let role = M::ROLE;

        for (index, descriptor) in mutations.iter().enumerate() {
            if !descriptor.targets(role) {
                continue;
            }

            match descriptor.action() {
                MutationAction::Identity => {}
                MutationAction::RemoveField { field } => {
                    if message.set(*field, None) {
                        trace!("#{index}: removed {field} from {role} hello");
                    } else {
                        debug!("#{index}: {role} hello has no {field}, skipping removal");
                    }
                }
                MutationAction::ModifyField { field, new_value } => {
                    if message.set(*field, Some(new_value.clone())) {
                        trace!("#{index}: set {field} on {role} hello to {new_value}");
                    } else {
                        debug!("#{index}: {role} hello has no {field}, skipping modification");
                    }
                }
                MutationAction::SendAdditionalPacket {
                    packet_type,
                    packet_content,
                } => {
                    trace!("#{index}: requesting additional {packet_type} from {role}");
                    self.sink.push(AdditionalPacket {
                        target: role,
                        packet_type: *packet_type,
                        packet_content: packet_content.clone(),
                    });
                }
            }
        }

        message
    }
}

/// Mutate a ClientHello with client-targeted descriptors; extra-packet requests are dropped
pub fn apply_to_client<'m>(message: &'m mut ClientHello, mutations: &MutationList) -> &'m mut ClientHello {
    Engine::new().apply_to_client(message, mutations)
}

/// Mutate a ServerHello with server-targeted descriptors; extra-packet requests are dropped
pub fn apply_to_server<'m>(message: &'m mut ServerHello, mutations: &MutationList) -> &'m mut ServerHello {
    Engine::new().apply_to_server(message, mutations)
}
