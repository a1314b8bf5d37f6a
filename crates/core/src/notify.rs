// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notification content and per-recipient batching.
//!
//! Link transitions produce [`Notice`]s; [`Templates`] turns them into
//! addressed [`NotificationMessage`]s and [`NotificationBatcher`] groups the
//! messages of one workflow invocation by recipient.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::link::Notice;

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
    pub sender: String,
    pub recipient: String,
}

/// Message templates and addressing, injected from configuration.
///
/// Bodies may contain `{course}` (the child course id) and `{help_desk}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    /// From address placed on every message.
    pub sender: String,
    /// Institutional domain appended to identities to form addresses.
    pub domain: String,
    /// Contact sentence substituted for `{help_desk}`.
    pub help_desk: String,
    pub request_subject: String,
    pub request_body: String,
    pub approved_subject: String,
    pub approved_body: String,
    pub denied_subject: String,
    pub denied_body: String,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            sender: "noreply@ucmail.uc.edu".to_string(),
            domain: "ucmail.uc.edu".to_string(),
            help_desk: "If you have any questions or concerns, please contact the IT@UC Help Desk \
                        by telephone at 513-556-HELP (4357) or by email at helpdesk@uc.edu."
                .to_string(),
            request_subject: "[BB Meta Courses] New Request for Approval".to_string(),
            request_body: "An instructor has requested to use one of your courses in a Meta \
                           Course. Please visit the meta course status page to approve or deny \
                           this request. {help_desk}"
                .to_string(),
            approved_subject: "[BB Meta Courses] One Of Your Requests Has Been Approved"
                .to_string(),
            approved_body: "Your request to use {course} has been approved. {help_desk}"
                .to_string(),
            denied_subject: "[BB Meta Courses] One Of Your Requests Has Been Denied".to_string(),
            denied_body: "Your request to use {course} has been denied. {help_desk}".to_string(),
        }
    }
}

impl Templates {
    /// Returns the contact address for an instructor identity.
    pub fn address_for(&self, identity: &str) -> String {
        format!("{identity}@{}", self.domain)
    }

    /// Renders a notice into an addressed message.
    pub fn render(&self, notice: &Notice) -> NotificationMessage {
        let (subject, body) = match notice {
            Notice::ApprovalRequested { .. } => (&self.request_subject, &self.request_body),
            Notice::Approved { .. } => (&self.approved_subject, &self.approved_body),
            Notice::Denied { .. } => (&self.denied_subject, &self.denied_body),
        };
        NotificationMessage {
            subject: subject.clone(),
            body: body
                .replace("{course}", notice.course())
                .replace("{help_desk}", &self.help_desk),
            sender: self.sender.clone(),
            recipient: self.address_for(notice.recipient()),
        }
    }
}

/// Collects the messages of one batch, keyed by recipient identity.
///
/// Recipients keep the order in which they were first seen; each
/// recipient's messages keep the order in which they were added.
#[derive(Debug, Default)]
pub struct NotificationBatcher {
    recipients: Vec<(String, Vec<NotificationMessage>)>,
    index: HashMap<String, usize>,
}

impl NotificationBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message for `recipient`.
    pub fn add(&mut self, recipient: &str, message: NotificationMessage) {
        self.slot(recipient).push(message);
    }

    /// Adds a message only if `recipient` has none yet.
    ///
    /// Returns true if the message was added. An owner asked about several
    /// courses in one batch gets a single approval request, whatever the
    /// request template renders.
    pub fn add_first(&mut self, recipient: &str, message: NotificationMessage) -> bool {
        let slot = self.slot(recipient);
        if !slot.is_empty() {
            return false;
        }
        slot.push(message);
        true
    }

    /// Number of distinct recipients.
    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Total number of messages across all recipients.
    pub fn len(&self) -> usize {
        self.recipients.iter().map(|(_, msgs)| msgs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every message, grouped by recipient in first-seen order.
    pub fn flatten(self) -> Vec<NotificationMessage> {
        self.recipients
            .into_iter()
            .flat_map(|(_, msgs)| msgs)
            .collect()
    }

    fn slot(&mut self, recipient: &str) -> &mut Vec<NotificationMessage> {
        let idx = match self.index.get(recipient) {
            Some(&idx) => idx,
            None => {
                self.recipients.push((recipient.to_string(), Vec::new()));
                let idx = self.recipients.len() - 1;
                self.index.insert(recipient.to_string(), idx);
                idx
            }
        };
        &mut self.recipients[idx].1
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
