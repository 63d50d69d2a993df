use std::path::Path;

use crate::settings::PlaybackSettings;

pub(crate) fn build_game_arguments(
    demo_path: &Path,
    play_demo_args: &[String],
    settings: &PlaybackSettings,
    exec_config: Option<&str>,
) -> Vec<String> {
    let mut arguments: Vec<String> = vec![
        "-insecure".to_string(),
        "-novid".to_string(),
        "-width".to_string(),
        settings.width.to_string(),
        "-height".to_string(),
        settings.height.to_string(),
    ];

    if settings.fullscreen {
        arguments.push("-fullscreen".to_string());
    } else {
        arguments.push("-sw".to_string());
    }

    if let Some(launch_parameters) = settings.launch_parameters.as_deref() {
        arguments.extend(launch_parameters.split_whitespace().map(str::to_string));
    }

    if let Some(config_name) = exec_config {
        arguments.push("+exec".to_string());
        arguments.push(config_name.to_string());
    }

    arguments.push("+playdemo".to_string());
    arguments.push(demo_path.to_string_lossy().to_string());
    arguments.extend(play_demo_args.iter().cloned());

    arguments
}

pub(crate) fn join_command_line(arguments: &[String]) -> String {
    arguments
        .iter()
        .map(|argument| {
            if argument.is_empty() || argument.chars().any(char::is_whitespace) {
                format!("\"{argument}\"")
            } else {
                argument.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{build_game_arguments, join_command_line};
    use crate::settings::PlaybackSettings;
    use std::path::Path;

    #[test]
    fn builds_windowed_arguments_with_play_demo_tokens() {
        let settings = PlaybackSettings::default();
        let arguments = build_game_arguments(
            Path::new("replays/match.dem"),
            &["76561198000000001".to_string()],
            &settings,
            None,
        );

        assert_eq!(
            arguments,
            vec![
                "-insecure",
                "-novid",
                "-width",
                "1920",
                "-height",
                "1080",
                "-sw",
                "+playdemo",
                "replays/match.dem",
                "76561198000000001",
            ]
        );
    }

    #[test]
    fn includes_user_parameters_and_exec_config() {
        let settings = PlaybackSettings {
            fullscreen: true,
            width: 1280,
            height: 720,
            launch_parameters: Some("  -console   +fps_max 120 ".to_string()),
            ..PlaybackSettings::default()
        };
        let arguments =
            build_game_arguments(Path::new("match.dem"), &[], &settings, Some("hlae"));

        assert_eq!(
            arguments,
            vec![
                "-insecure",
                "-novid",
                "-width",
                "1280",
                "-height",
                "720",
                "-fullscreen",
                "-console",
                "+fps_max",
                "120",
                "+exec",
                "hlae",
                "+playdemo",
                "match.dem",
            ]
        );
    }

    #[test]
    fn quotes_arguments_containing_spaces() {
        let command_line = join_command_line(&[
            "+playdemo".to_string(),
            "C:\\My Demos\\match.dem".to_string(),
            "-novid".to_string(),
        ]);

        assert_eq!(command_line, "+playdemo \"C:\\My Demos\\match.dem\" -novid");
    }
}
