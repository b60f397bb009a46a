//! System prompts and schema field descriptions for the three model calls.

pub const CLASSIFIER_SYSTEM_PROMPT: &str = "You are a classification expert. You will be given a diarization with Speaker 0 and Speaker 1. Your job is to identify which one is the salesperson and which one is the customer.";

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert call analyst at a real-estate company. You will be given a conversation between a customer and a salesperson; your task is to generate a summary based on various parameters.";

pub const RATINGS_SYSTEM_PROMPT: &str = "You are a helpful real-estate sales assistant. Based on the transcript log between a human salesperson and a customer, analyze the following parameters:

    1. rudeness_or_politeness_metric
    2. salesperson_company_introduction
    3. meeting_request
    4. salesperson_understanding_of_customer_requirements
    5. customer_sentiment_by_the_end_of_call
    6. customer_eagerness_to_buy
    7. customer_budget
    8. customer_preferences
";

// Classifier field descriptions

pub const SPEAKER_0_DESCRIPTION: &str = "Whether [Speaker:0] is the salesperson or the customer";

pub const SPEAKER_1_DESCRIPTION: &str = "Whether [Speaker:1] is the salesperson or the customer";

// Summary field descriptions

pub const SUMMARY_TITLE: &str =
    "A short title for the sales call which explains the whole conversation.";

pub const SUMMARY_DISCUSSION_POINTS: &str =
    "The key discussion points from the conversation between the salesperson and customer, as bullet points.";

pub const SUMMARY_CUSTOMER_QUERIES: &str =
    "The queries raised by the customer regarding the properties, as bullet points.";

pub const SUMMARY_NEXT_ACTION_ITEMS: &str =
    "Based on the conversation, the next action items for the salesperson, as bullet points.";

pub const SUMMARY_MEETING_REQUEST_ATTEMPT: &str = "Whether the salesperson attempted to schedule a meeting or site visit. If there was an attempt, describe what the salesperson said or did to initiate it; otherwise state explicitly that no attempt was made.";

// Rating field descriptions (all on a 1-4 scale)

pub const RATING_RUDENESS_POLITENESS: &str = "Rate the salesperson's rudeness or politeness.
    1: Rude: disrespectful words or a rude tone towards the customer.
    2: Neutral: respectful, courteous and professional.
    3: Moderately polite: courteous language, consideration and a friendly tone.
    4: Extremely polite: exceptionally formal, deferential and considerate.";

pub const RATING_COMPANY_INTRODUCTION: &str = "Rate how well the salesperson introduced themselves and the company at the start of the call.
    1: Basic self-introduction with no company detail.
    2: Mentioned the company name along with introducing themselves.
    3: Included a few points about the company but not all of them.
    4: Full introduction of themselves and the company's services.";

pub const RATING_MEETING_REQUEST: &str = "Rate the salesperson's effort to encourage a meeting or site visit. A clear mention of \"meeting\" or \"site visit\" with discussion of date and time indicates a meeting request; sharing location details or phone numbers alone does not.
    1: No explicit attempt to encourage a meeting or site visit.
    2: Minimal effort, a subtle openness to ongoing communication.
    3: Moderate effort: engaged the customer and suggested further communication.
    4: High effort with clear intent, including a date/time discussion.";

pub const RATING_REQUIREMENT_UNDERSTANDING: &str = "Rate the salesperson's grasp of the customer's requirements: awareness of their queries, meaningful engagement, market knowledge, relevant property options, active listening.
    1: Poor.  2: Satisfactory.  3: Good.  4: Highly effective.";

pub const RATING_CUSTOMER_SENTIMENT: &str = "Rate the customer's sentiment by the end of the call based on satisfaction and likelihood to continue engaging. More queries about the property, configuration, payment plans and amenities means better sentiment.
    1: Dissatisfied and unlikely to continue.
    2: Neutral.
    3: Satisfied and likely to continue.
    4: Highly satisfied, agreed to continue via other channels.";

pub const RATING_CUSTOMER_EAGERNESS: &str = "Rate the customer's eagerness to buy. Clear enquiries about possession, payment plans or site visits indicate strong eagerness.
    1: Not eager.  2: Slightly interested.  3: Very interested, no clear intent.  4: Extremely eager to buy in the near future.";

pub const RATING_CUSTOMER_BUDGET: &str = "If the customer mentioned a budget during the conversation, return it. Do not infer a budget solely from the salesperson's guess; if the salesperson proposes one and the customer agrees, that counts.";

pub const RATING_CUSTOMER_PREFERENCES: &str = "The customer's preferences for purchasing a property: preferred locality, project or builder, and the type and size of property, from explicit statements and clear implications in the conversation.";
