//! Prompt templates for the course tutor. Rendering is plain string
//! substitution on the named markers.

pub const TUTOR_PROMPT: &str = "\
Tu es un assistant intelligent conçu pour aider les enseignants à répondre aux questions des étudiants sur le cours de NLP en utilisant le contexte fourni.

à la fin de ta réponse, ajoute les références de cours qui ont été utilisées pour formuler ta réponse.

Voici un exemple :
Utilisateur : Qu'est-ce que le tokenization en NLP ?
Assistant : La tokenization est le processus de division d'un texte en unités plus petites appelées \"tokens\", qui peuvent être des mots, des phrases ou des sous-mots.
Source: Cours NLP - Introduction au NLP, Section 2.1

Utilise le contexte ci-dessous pour répondre à la question de l'étudiant, posée dans son dernier message. Sers-toi uniquement des notes de cours pour formuler ta réponse. Si tu ne trouves pas la réponse dans le contexte, réponds honnêtement que tu ne sais pas.
Context: {context}
";

pub const PROFILE_EXTRACT_PROMPT: &str = "\
Tu es un assistant qui extrait des faits STABLES sur l'élève à partir de son message actuel.
Ne fais pas d'inférences au-delà du texte. Retourne un JSON avec:
{
  \"niveau\": (ou null),
  \"objectifs\": [ ... ],
  \"preferences\": [ ... ],
  \"difficultes\": [ ... ],
  \"faits\": { \"clé\": \"valeur\", ... }
}
Texte élève:
";

pub const SUMMARY_PROMPT: &str = "\
Résume progressivement la conversation ci-dessous entre un étudiant et l'assistant de cours.
Conserve les points importants du résumé existant et intègre les nouveaux échanges.
Réponds uniquement avec le nouveau résumé, sans commentaire.

Résumé existant:
{summary}

Nouveaux échanges:
{messages}
";

/// The question itself is not part of the system prompt; it travels as the
/// final user turn of the request.
pub fn render_tutor_prompt(context: &str) -> String {
    TUTOR_PROMPT.replace("{context}", context)
}

pub fn render_profile_extract_prompt(student_message: &str) -> String {
    format!("{}{}", PROFILE_EXTRACT_PROMPT, student_message)
}

pub fn render_summary_prompt(existing_summary: &str, messages: &str) -> String {
    SUMMARY_PROMPT
        .replace("{summary}", existing_summary)
        .replace("{messages}", messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutor_prompt_substitution() {
        let rendered = render_tutor_prompt("le contexte du cours");

        assert!(rendered.contains("Context: le contexte du cours"));
        assert!(!rendered.contains("{context}"));
    }

    #[test]
    fn test_summary_prompt_substitution() {
        let rendered = render_summary_prompt("rien pour l'instant", "Étudiant: bonjour");
        assert!(rendered.contains("rien pour l'instant"));
        assert!(rendered.contains("Étudiant: bonjour"));
    }

    #[test]
    fn test_profile_prompt_appends_message() {
        let rendered = render_profile_extract_prompt("je suis en master 1");
        assert!(rendered.ends_with("je suis en master 1"));
        assert!(rendered.contains("faits STABLES"));
    }
}
