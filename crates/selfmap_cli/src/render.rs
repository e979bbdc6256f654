//! Plain-text rendering of the board and notices.

use selfmap_core::{BoardSnapshot, NoticeLevel, SyncNotice};
use std::fmt::Write;

pub fn board_text(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Evidence ({})", snapshot.unassigned.len());
    if snapshot.unassigned.is_empty() {
        let _ = writeln!(out, "  (empty)");
    }
    for item in &snapshot.unassigned {
        let _ = writeln!(out, "  {}  {}  {}", item.id, item.date, item.content);
    }
    for owner in &snapshot.traits {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}  [{}] ({})", owner.name, owner.id, owner.evidence.len());
        for item in &owner.evidence {
            let _ = writeln!(out, "  {}  {}  {}", item.id, item.date, item.content);
        }
    }
    out
}

pub fn notice_line(notice: &SyncNotice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}: {}", notice.title, notice.description)
}
