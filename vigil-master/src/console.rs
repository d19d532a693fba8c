use vigil_core::{AlarmKind, Channel, Command, DangerLevel, PingRecord, PowerLevel, RadioId};

/// Operator-selected values that the next pushed command is built from.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleState {
    pub target: RadioId,
    pub power: PowerLevel,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            target: RadioId(1),
            power: PowerLevel::High,
        }
    }
}

/// What one console line asks the Master to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    /// Step the local channel and re-init the radio.
    ChannelUp,
    ChannelDown,
    /// Cycle the local power step and re-init the radio.
    CyclePower,
    /// Push a configuration command to the selected target node.
    Push(Command),
    Status,
    Help,
    Quit,
}

/// Single-character command alphabet with an optional digit argument.
///
/// The mapping mutates `state` for the selection commands and yields an
/// action for everything else; the caller builds the actual `PingRecord`
/// because only it knows the Master's active channel.
pub fn parse_command(line: &str, state: &mut ConsoleState) -> Option<ConsoleAction> {
    let line = line.trim();
    let mut chars = line.chars();
    let command = chars.next()?;
    let arg: Option<u8> = chars.as_str().trim().parse().ok();

    match command {
        '1'..='5' => {
            // Digits select the target node for subsequent pushes.
            state.target = RadioId(command as u8 - b'0');
            tracing::info!(node = state.target.0, "target node selected");
            None
        }
        '+' => Some(ConsoleAction::ChannelUp),
        '-' => Some(ConsoleAction::ChannelDown),
        'p' => {
            state.power = state.power.next();
            tracing::info!(power = ?state.power, "pending power step selected");
            Some(ConsoleAction::CyclePower)
        }
        'n' => Some(ConsoleAction::Push(Command::None)),
        'c' => Some(ConsoleAction::Push(Command::ChangeChannel)),
        'r' => {
            let radio_id = node_id_arg(arg, state)?;
            Some(ConsoleAction::Push(Command::ChangeRadioId { radio_id }))
        }
        'w' => Some(ConsoleAction::Push(Command::ChangePower {
            power: state.power,
        })),
        'a' => {
            let radio_id = node_id_arg(arg, state)?;
            Some(ConsoleAction::Push(Command::ChangeAll {
                radio_id,
                power: state.power,
            }))
        }
        't' => Some(ConsoleAction::Push(Command::ChangeTarget)),
        'k' => Some(ConsoleAction::Push(Command::Acknowledge)),
        's' => Some(ConsoleAction::Status),
        '?' | 'h' => Some(ConsoleAction::Help),
        'q' => Some(ConsoleAction::Quit),
        other => {
            tracing::warn!(command = %other, "unknown console command");
            None
        }
    }
}

/// Renumber arguments must stay inside the TX node range; id 0 belongs to
/// the Master, and a node renumbered to it would transmit on a pipe nobody
/// listens on.
fn node_id_arg(arg: Option<u8>, state: &ConsoleState) -> Option<RadioId> {
    let id = RadioId(arg.unwrap_or(state.target.0));
    if !id.is_node() {
        tracing::warn!(node = id.0, "renumber id outside node range, ignored");
        return None;
    }
    Some(id)
}

/// Build the ping a `Push` action sends, addressed on the Master's active
/// channel to the currently selected target.
pub fn build_push(channel: Channel, state: &ConsoleState, command: Command) -> PingRecord {
    PingRecord {
        channel,
        target_id: state.target,
        command,
        alarm_kind: AlarmKind::None,
        danger_level: DangerLevel::None,
    }
}

pub const HELP_TEXT: &str = "\
commands:
  1-5    select target node
  +/-    step local channel up/down (re-inits the radio)
  p      cycle pending power step (also applied locally)
  n      push link probe (no parameter change)
  c      push ChangeChannel to target
  r [id] push ChangeRadioId to target (id 1-5)
  w      push ChangePower (pending power) to target
  a [id] push ChangeAll to target (id 1-5)
  t      push ChangeTarget to target
  k      push alarm acknowledgment to target
  s      status dump
  q      quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_selects_target() {
        let mut state = ConsoleState::default();
        assert_eq!(parse_command("4", &mut state), None);
        assert_eq!(state.target, RadioId(4));
    }

    #[test]
    fn push_uses_argument_for_radio_id() {
        let mut state = ConsoleState::default();
        let action = parse_command("r 3", &mut state);
        assert_eq!(
            action,
            Some(ConsoleAction::Push(Command::ChangeRadioId {
                radio_id: RadioId(3)
            }))
        );
    }

    #[test]
    fn renumber_outside_node_range_is_rejected() {
        let mut state = ConsoleState::default();
        assert_eq!(parse_command("r 0", &mut state), None);
        assert_eq!(parse_command("a 6", &mut state), None);
        assert_eq!(parse_command("r 200", &mut state), None);
        assert_eq!(state.target, RadioId(1), "selection left untouched");
    }

    #[test]
    fn unknown_input_is_ignored() {
        let mut state = ConsoleState::default();
        assert_eq!(parse_command("z", &mut state), None);
        assert_eq!(parse_command("", &mut state), None);
    }

    #[test]
    fn build_push_addresses_selected_target() {
        let mut state = ConsoleState::default();
        parse_command("2", &mut state);
        let ping = build_push(Channel(81), &state, Command::Acknowledge);
        assert_eq!(ping.target_id, RadioId(2));
        assert_eq!(ping.channel, Channel(81));
        assert_eq!(ping.alarm_kind, AlarmKind::None);
    }
}
