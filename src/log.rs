use serde::Serialize;
use serde_json::json;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogEntry {
    pub tick: u64,
    pub text: String,
}

/// Ordered, human-readable record of a battle.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BattleLog {
    entries: Vec<LogEntry>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, tick: u64, text: String) {
        tracing::debug!(tick, "{text}");
        self.entries.push(LogEntry { tick, text });
    }

    pub fn log_status(&mut self, tick: u64, a: &str, b: &str) {
        self.push(tick, format!("{a}\t{b}"));
    }

    pub fn log_fast(&mut self, tick: u64, attacker: &str, defender: &str, move_id: &str) {
        self.push(tick, format!("{attacker} attacked {defender} with {move_id}"));
    }

    pub fn log_sneak(&mut self, tick: u64, attacker: &str, defender: &str, move_id: &str) {
        self.push(
            tick,
            format!("{attacker} sneaked attacked {defender} with {move_id}"),
        );
    }

    pub fn log_charge_pending(&mut self, tick: u64, attacker: &str) {
        self.push(tick, format!("{attacker} is throwing a charge move"));
    }

    pub fn log_charge(&mut self, tick: u64, attacker: &str, move_id: &str) {
        self.push(tick, format!("{attacker} threw {move_id}"));
    }

    pub fn log_shield(&mut self, tick: u64, defender: &str) {
        self.push(tick, format!("{defender} used a shield"));
    }

    pub fn log_boost(&mut self, tick: u64, target: &str, atk: i32, def: i32) {
        self.push(tick, format!("{target} boost! [{atk}, {def}]"));
    }

    pub fn log_debuff(&mut self, tick: u64, target: &str, atk: i32, def: i32) {
        self.push(tick, format!("{target} debuff! [{atk}, {def}]"));
    }

    pub fn log_faint(&mut self, tick: u64, target: &str) {
        self.push(tick, format!("{target} fainted"));
    }

    pub fn log_win(&mut self, tick: u64, winner: &str, remaining: f64) {
        self.push(
            tick,
            format!(
                "{winner} won with {:.2}% health remaining!",
                remaining * 100.0
            ),
        );
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("[{}] {}", e.tick, e.text))
            .collect()
    }

    /// One line per tick, events of the same tick joined with `"  -  "`.
    pub fn by_tick(&self) -> Vec<String> {
        let mut out: Vec<(u64, Vec<&str>)> = Vec::new();
        for entry in &self.entries {
            if let Some((tick, texts)) = out.last_mut() {
                if *tick == entry.tick {
                    texts.push(entry.text.as_str());
                    continue;
                }
            }
            out.push((entry.tick, vec![entry.text.as_str()]));
        }
        out.into_iter()
            .map(|(tick, texts)| format!("[{tick}] {}", texts.join("  -  ")))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "log": self.lines(),
        })
    }
}
