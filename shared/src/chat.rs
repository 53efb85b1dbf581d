//! Assistant chat messages and the canned per-locale text the simulator uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Opening assistant message of every conversation.
pub fn greeting(locale: Locale) -> &'static str {
    match locale {
        Locale::Pt => "Olá! Sou o Assistente TEO, seu assistente virtual. Estou aqui para oferecer suporte emocional e soluções práticas. Como posso ajudar você hoje?",
        Locale::En => "Hello! I am TEO Assistant, your virtual assistant. I am here to offer emotional support and practical solutions. How can I help you today?",
        Locale::Es => "¡Hola! Soy el Asistente TEO, tu asistente virtual. Estoy aquí para ofrecer apoyo emocional y soluciones prácticas. ¿Cómo puedo ayudarte hoy?",
    }
}

/// Suggested first messages offered as one-tap buttons.
pub fn quick_prompts(locale: Locale) -> &'static [&'static str] {
    match locale {
        Locale::Pt => &["Estou me sentindo sobrecarregado(a)", "Como lidar com birras?"],
        Locale::En => &["I am feeling overwhelmed", "How to deal with tantrums?"],
        Locale::Es => &["Me siento abrumado(a)", "¿Cómo lidiar con berrinches?"],
    }
}

/// Replies the simulator picks from uniformly. Never empty.
pub fn canned_replies(locale: Locale) -> &'static [&'static str] {
    match locale {
        Locale::Pt => &[
            "Entendo como você está se sentindo. É completamente normal se sentir sobrecarregado às vezes. Lembre-se de que você está fazendo um trabalho incrível.",
            "Essa é uma ótima pergunta. Aqui estão algumas estratégias que podem ajudar: 1) Mantenha a calma, 2) Valide os sentimentos da criança, 3) Ofereça um espaço seguro.",
            "Estou aqui para apoiar você. Cada criança é única, e encontrar o que funciona melhor pode levar tempo. Seja paciente consigo mesmo.",
        ],
        Locale::En => &[
            "I understand how you are feeling. It is completely normal to feel overwhelmed sometimes. Remember that you are doing an amazing job.",
            "That is a great question. Here are some strategies that can help: 1) Stay calm, 2) Validate the child's feelings, 3) Offer a safe space.",
            "I am here to support you. Every child is unique, and finding what works best can take time. Be patient with yourself.",
        ],
        Locale::Es => &[
            "Entiendo cómo te sientes. Es completamente normal sentirse abrumado a veces. Recuerda que estás haciendo un trabajo increíble.",
            "Esa es una gran pregunta. Aquí hay algunas estrategias que pueden ayudar: 1) Mantén la calma, 2) Valida los sentimientos del niño, 3) Ofrece un espacio seguro.",
            "Estoy aquí para apoyarte. Cada niño es único, y encontrar lo que funciona mejor puede llevar tiempo. Sé paciente contigo mismo.",
        ],
    }
}
