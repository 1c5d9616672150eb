//! Prompt construction for lyric generation.
//!
//! Two entry points:
//! - [`create_form_prompt`]: renders every field of a [`GenerationRequest`]
//!   into labeled sections followed by a fixed instruction block.
//! - [`create_chat_system_prompt`]: the songwriting-assistant persona for
//!   the conversational flow.
//!
//! Both are plain `format!` interpolation over a small, fixed field set.
//! Non-default languages get a fixed directive block inserted verbatim.

use lyricsmith_types::generation::GenerationRequest;
use lyricsmith_types::language::Language;
use lyricsmith_types::message::Message;

/// Rendered in the "Avoid Clichés" line when the user picked none.
pub const NO_CLICHE_RESTRICTIONS: &str = "No specific restrictions";

/// Rendered in the "Special Phrases" line when the field was left blank.
pub const NO_SPECIAL_PHRASES: &str = "None";

const HINDI_DIRECTIVE: &str = "\
**Language Requirements (Hindi)**:
- Write the ENTIRE song in Hindi using Devanagari script (हिन्दी).
- Do not transliterate into Latin letters and do not mix in English lines.
- Draw on the imagery, idioms and poetic devices of Hindi songwriting.
- Keep the section labels in English exactly as written: [Verse 1], [Chorus], [Verse 2], [Bridge], [Outro].";

const TELUGU_DIRECTIVE: &str = "\
**Language Requirements (Telugu)**:
- Write the ENTIRE song in Telugu using Telugu script (తెలుగు).
- Do not transliterate into Latin letters and do not mix in English lines.
- Draw on the imagery, idioms and poetic devices of Telugu songwriting.
- Keep the section labels in English exactly as written: [Verse 1], [Chorus], [Verse 2], [Bridge], [Outro].";

const FORM_INSTRUCTIONS: &str = "\
**Instructions**:
1. Create authentic, original lyrics that capture the essence of this memory
2. Use vivid imagery and sensory details
3. Ensure the lyrics match the specified genre, mood, and tone
4. Follow the requested song structure (clearly label: [Verse 1], [Chorus], [Verse 2], [Bridge], etc.)
5. Make the lyrics personal and emotionally resonant
6. Incorporate any requested special phrases naturally
7. Avoid the specified clichés and overused expressions
8. Use varied rhyme schemes appropriate to the genre
9. Keep the language true to the emotional core and the cultural setting of the memory
10. Think step by step about the narrative arc of the song

Generate only the song lyrics with clear section labels. Do not include explanations or commentary.";

/// Fixed directive block for a non-default language, `None` for English.
pub fn language_directive(language: Language) -> Option<&'static str> {
    match language {
        Language::English => None,
        Language::Hindi => Some(HINDI_DIRECTIVE),
        Language::Telugu => Some(TELUGU_DIRECTIVE),
    }
}

/// Render the single-shot generation prompt for a form submission.
///
/// The caller must have validated the request (non-empty memory).
pub fn create_form_prompt(request: &GenerationRequest) -> String {
    let special_phrases = request
        .special_phrases
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_SPECIAL_PHRASES);

    let avoid = if request.avoid_cliches.is_empty() {
        NO_CLICHE_RESTRICTIONS.to_string()
    } else {
        request.avoid_cliches.join(", ")
    };

    let mut sections = Vec::with_capacity(4);

    sections.push(
        "You are an expert songwriter and lyricist. Generate creative, emotionally resonant \
         song lyrics based on the following details:"
            .to_string(),
    );

    sections.push(format!(
        "**Memory/Story**: {memory}\n\
         **Main Emotion**: {emotion}\n\
         **Genre**: {genre}\n\
         **Tempo**: {tempo}\n\
         **Perspective**: {perspective}\n\
         **Mood**: {mood}\n\
         **Structure**: {structure}\n\
         **Length**: {length}\n\
         **Special Phrases to Include**: {special_phrases}\n\
         **Song is for/about**: {song_for}\n\
         **Tone**: {tone}\n\
         **Avoid Clichés**: {avoid}\n\
         **Language**: {language}",
        memory = request.memory,
        emotion = request.emotion,
        genre = request.genre,
        tempo = request.tempo,
        perspective = request.perspective,
        mood = request.mood,
        structure = request.structure,
        length = request.length,
        song_for = request.song_for,
        tone = request.tone,
        language = request.language,
    ));

    if let Some(directive) = language_directive(request.language) {
        sections.push(directive.to_string());
    }

    sections.push(FORM_INSTRUCTIONS.to_string());

    sections.join("\n\n")
}

/// Render the system prompt that opens a chat conversation.
pub fn create_chat_system_prompt(language: Language) -> String {
    let mut prompt = format!(
        "Greet the user warmly and introduce yourself as a songwriting companion who helps \
         people turn their precious memories into song lyrics.\n\
         \n\
         You are an expert songwriter and lyricist chatting with the user in {language}. In this conversation:\n\
         1. Ask the user to share a memory or story that is special to them\n\
         2. Ask gentle follow-up questions, one or two at a time, about the emotion, genre, tempo, \
         perspective, mood and who the song is for\n\
         3. When you have enough detail, or the user asks for it, write complete lyrics with clear \
         section labels: [Verse 1], [Chorus], [Verse 2], [Bridge], etc.\n\
         4. Use vivid imagery, varied rhyme schemes and fresh language; avoid clichés\n\
         5. Offer to revise the lyrics and apply the user's feedback faithfully\n\
         \n\
         Keep your replies warm and concise. Always respond in {language}."
    );

    if let Some(directive) = language_directive(language) {
        prompt.push_str("\n\n");
        prompt.push_str(directive);
    }

    prompt
}

/// Message list for a form submission: a single user message.
pub fn form_messages(request: &GenerationRequest) -> Vec<Message> {
    vec![Message::user(create_form_prompt(request))]
}
