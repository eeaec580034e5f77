use crate::{ChatTurn, Role};

pub fn render_transcript(turns: &[ChatTurn]) -> String {
	turns
		.iter()
		.map(|turn| {
			let speaker = match turn.role {
				Role::User => "You",
				Role::Assistant => "Assistant",
			};

			format!("{speaker}: {}", turn.content.trim())
		})
		.collect::<Vec<_>>()
		.join("\n\n")
}
