//! Instruction templates for derived text
//!
//! Slots are filled by plain substitution. Caller text is inserted as-is.

/// Turns a free-form music description into comma-separated style tags
pub const TAG_TEMPLATE: &str = r#"Rewrite the music description below as one line of comma-separated audio tags.

Description: "{user_prompt}"

Rules for the tag list:
- Name a genre (for example "rap", "pop", "rock", "electronic")
- Name the vocal type (for example "male vocal", "female vocal", "spoken word")
- Name the instruments that would be heard (for example "guitar", "piano", "synthesizer", "drums")
- Name the mood or energy (for example "energetic", "calm", "aggressive", "melancholic")
- Add the tempo when it is known (for example "120 bpm", "fast tempo", "slow tempo")
- Add the key when it is known (for example "major key", "minor key", "C major")
- Answer with the tags only, on a single line, with no explanation. Example: melodic techno, male vocal, electronic, emotional, minor key, 124 bpm, synthesizer, driving, atmospheric

If the description is already a short list of tags, keep them and add two or three close synonyms without introducing new categories.

Tags:
"#;

/// Writes song lyrics for a description
pub const LYRICS_TEMPLATE: &str = r#"You write song lyrics for a music generator.
Write lyrics that follow the description below and nothing else.
Do not introduce themes, places or characters the description does not suggest.

Rules:
1. Reply with the lyrics only. No commentary or notes.
2. Mark every section with one of these tags: [intro], [verse], [chorus], [bridge], [outro].
3. Write tags in lowercase inside square brackets, alone on the line that starts the section.
4. Use no other section names.
5. Put no punctuation around the tags.
6. Match the tone and imagery of the description.
7. Write between three and six sections.
8. Keep rhyme and rhythm consistent.

Layout example:
[verse]
Streetlights hum along the avenue
Every window glowing something new
I keep walking with the city's pulse
Till the morning comes and nothing else

[chorus]
Hold on to the night a little more
Hear it knocking softly at the door

Description:
"{description}"

Lyrics:
"#;

/// Lists a few genres or categories for a description
pub const CATEGORIES_TEMPLATE: &str = "List 3-5 relevant genres or categories for the music description below as a \
comma-separated list, for example: Pop, Electronic, Sad, 80s. Description: '{description}'";

pub fn tag_instruction(user_prompt: &str) -> String {
    TAG_TEMPLATE.replace("{user_prompt}", user_prompt)
}

pub fn lyrics_instruction(description: &str) -> String {
    LYRICS_TEMPLATE.replace("{description}", description)
}

pub fn categories_instruction(description: &str) -> String {
    CATEGORIES_TEMPLATE.replace("{description}", description)
}
