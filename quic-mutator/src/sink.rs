// quic-mutator/src/sink.rs
//! Hand-off point for `send_additional_packet` requests.
//!
//! The engine does not build or send packets. When it meets a
//! `send_additional_packet` descriptor it pushes an [`AdditionalPacket`] into
//! the engine's [`PacketSink`]; the transport layer drains it and emits the
//! extra packet alongside the mutated hello.

use crate::hello::FieldValue;
use crate::schema::{PacketType, Target};
use log::debug;
use serde::Serialize;

/// Extra packet the transport is asked to emit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdditionalPacket {
    /// Role whose hello carried the request
    pub target: Target,
    pub packet_type: PacketType,
    pub packet_content: FieldValue,
}

/// Receiver for additional-packet requests
pub trait PacketSink {
    fn push(&mut self, packet: AdditionalPacket);
}

impl PacketSink for Vec<AdditionalPacket> {
    fn push(&mut self, packet: AdditionalPacket) {
        Vec::push(self, packet);
    }
}

impl<S: PacketSink + ?Sized> PacketSink for &mut S {
    fn push(&mut self, packet: AdditionalPacket) {
        (**self).push(packet);
    }
}

/// Sink used when no transport is attached; requests are logged and dropped
#[derive(Debug, Default, Clone, Copy)]
pub struct DropSink;

impl PacketSink for DropSink {
    fn push(&mut self, packet: AdditionalPacket) {
        debug!(
            "No packet sink attached, dropping additional {} requested by {}",
            packet.packet_type, packet.target
        );
    }
}
